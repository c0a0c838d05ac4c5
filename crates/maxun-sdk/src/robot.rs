//! Robot lifecycle proxy
//!
//! A [`Robot`] wraps one server-side robot record. Reads of metadata come
//! from the cached snapshot; every mutating call replaces the whole
//! snapshot with the record the server returns. Nothing is merged locally.
//!
//! After [`Robot::delete`] the proxy refuses further remote calls with
//! `MaxunError::RobotDeleted`.

use maxun_client::{
    latest_run, Client, ExecutionOptions, RobotData, RobotUpdate, Run, RunResult,
    ScheduleConfig, WebhookConfig,
};
use maxun_core::{MaxunError, Result, RobotType};
use maxun_workflow::Workflow;

#[derive(Debug, Clone)]
pub struct Robot {
    client: Client,
    data: RobotData,
    deleted: bool,
}

impl Robot {
    pub fn new(client: Client, data: RobotData) -> Self {
        Self {
            client,
            data,
            deleted: false,
        }
    }

    /// Robot id used in API paths
    pub fn id(&self) -> &str {
        self.data.robot_id()
    }

    pub fn name(&self) -> &str {
        &self.data.recording_meta.name
    }

    pub fn robot_type(&self) -> Option<RobotType> {
        self.data.robot_type()
    }

    /// Latest snapshot received from the server
    pub fn data(&self) -> &RobotData {
        &self.data
    }

    pub fn workflow(&self) -> &Workflow {
        &self.data.recording.workflow
    }

    /// Schedule as last returned by the server
    pub fn get_schedule(&self) -> Option<&ScheduleConfig> {
        self.data.schedule.as_ref()
    }

    pub fn webhooks(&self) -> &[WebhookConfig] {
        self.data.webhooks.as_deref().unwrap_or_default()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    // Execution

    /// Run with default options and wait for the result
    pub async fn run(&self) -> Result<RunResult> {
        self.run_with(&ExecutionOptions::default()).await
    }

    /// Run with parameter/webhook/timeout overrides
    pub async fn run_with(&self, options: &ExecutionOptions) -> Result<RunResult> {
        self.ensure_live()?;
        let result = self.client.execute_robot(self.id(), options).await?;
        tracing::info!(
            "Run {} of robot {} finished with status {}",
            result.run_id,
            self.id(),
            result.status
        );
        Ok(result)
    }

    pub async fn get_runs(&self) -> Result<Vec<Run>> {
        self.ensure_live()?;
        self.client.get_runs(self.id()).await
    }

    pub async fn get_run(&self, run_id: &str) -> Result<Run> {
        self.ensure_live()?;
        self.client.get_run(self.id(), run_id).await
    }

    /// Most recently started run, `None` when the robot never ran
    pub async fn get_latest_run(&self) -> Result<Option<Run>> {
        Ok(latest_run(self.get_runs().await?))
    }

    pub async fn abort(&self, run_id: &str) -> Result<()> {
        self.ensure_live()?;
        self.client.abort_run(self.id(), run_id).await
    }

    // Mutations (snapshot replace)

    pub async fn schedule(&mut self, schedule: &ScheduleConfig) -> Result<()> {
        self.ensure_live()?;
        let data = self.client.schedule_robot(self.id(), schedule).await?;
        self.replace(data);
        Ok(())
    }

    pub async fn unschedule(&mut self) -> Result<()> {
        self.ensure_live()?;
        let data = self.client.unschedule_robot(self.id()).await?;
        self.replace(data);
        Ok(())
    }

    pub async fn add_webhook(&mut self, webhook: &WebhookConfig) -> Result<()> {
        self.ensure_live()?;
        let data = self.client.add_webhook(self.id(), webhook).await?;
        self.replace(data);
        Ok(())
    }

    pub async fn remove_webhooks(&mut self) -> Result<()> {
        self.ensure_live()?;
        let data = self.client.remove_webhooks(self.id()).await?;
        self.replace(data);
        Ok(())
    }

    pub async fn update(&mut self, update: &RobotUpdate) -> Result<()> {
        self.ensure_live()?;
        let data = self.client.update_robot(self.id(), update).await?;
        self.replace(data);
        Ok(())
    }

    /// Re-fetch the snapshot unconditionally
    pub async fn refresh(&mut self) -> Result<()> {
        self.ensure_live()?;
        let data = self.client.get_robot(self.id()).await?;
        self.replace(data);
        Ok(())
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.client.delete_robot(self.id()).await?;
        self.deleted = true;
        Ok(())
    }

    fn replace(&mut self, data: RobotData) {
        tracing::debug!("Replacing snapshot of robot {}", self.id());
        self.data = data;
    }

    fn ensure_live(&self) -> Result<()> {
        if self.deleted {
            return Err(MaxunError::RobotDeleted(self.id().to_string()));
        }
        Ok(())
    }
}
