//! Request bodies sent to the robot API

use maxun_core::{RobotMeta, RobotType};
use maxun_workflow::{Workflow, WorkflowFile};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{CrawlConfig, LlmExtractOptions, ScheduleConfig, SearchConfig, WebhookConfig};

/// `POST /robots`: metadata with `robotType` mirrored into `type`
#[derive(Debug, Serialize)]
pub(crate) struct CreateRobotRequest<'a> {
    pub meta: CreateMeta<'a>,
    pub workflow: &'a Workflow,
    #[serde(rename = "deepExtractionUrls", skip_serializing_if = "<[String]>::is_empty")]
    pub deep_extraction_urls: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateMeta<'a> {
    #[serde(flatten)]
    pub meta: &'a RobotMeta,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub robot_type: Option<RobotType>,
}

impl<'a> From<&'a WorkflowFile> for CreateRobotRequest<'a> {
    fn from(file: &'a WorkflowFile) -> Self {
        Self {
            meta: CreateMeta {
                meta: &file.meta,
                robot_type: file.meta.robot_type,
            },
            workflow: &file.workflow,
            deep_extraction_urls: &file.deep_extraction_urls,
        }
    }
}

/// Partial robot update
///
/// `schedule` and `webhooks` are tri-state: absent (unchanged), `null`
/// (cleared) or a value (replaced).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RobotUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<RobotMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Workflow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Option<ScheduleConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhooks: Option<Option<Vec<WebhookConfig>>>,
}

impl RobotUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meta(mut self, meta: RobotMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_workflow(mut self, workflow: Workflow) -> Self {
        self.workflow = Some(workflow);
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleConfig) -> Self {
        self.schedule = Some(Some(schedule));
        self
    }

    pub fn clear_schedule(mut self) -> Self {
        self.schedule = Some(None);
        self
    }

    pub fn with_webhooks(mut self, webhooks: Vec<WebhookConfig>) -> Self {
        self.webhooks = Some(Some(webhooks));
        self
    }

    pub fn clear_webhooks(mut self) -> Self {
        self.webhooks = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.meta.is_none()
            && self.workflow.is_none()
            && self.schedule.is_none()
            && self.webhooks.is_none()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExecuteRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<&'a Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<&'a WebhookConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LlmExtractRequest<'a> {
    pub url: &'a str,
    #[serde(flatten)]
    pub options: &'a LlmExtractOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CrawlRequest<'a> {
    pub url: &'a str,
    pub name: &'a str,
    pub crawl_config: &'a CrawlConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchRequest<'a> {
    pub name: &'a str,
    pub search_config: &'a SearchConfig,
}
