//! HTTP client for the Maxun robot API
//!
//! Every call is a single request with a per-call timeout. No retries are
//! attempted. Errors are mapped as follows:
//!
//! - no response (network failure, timeout) -> `Transport`
//! - non-2xx status -> `Api`, message from the body's `error`/`message`
//! - 2xx without `data` where a record is expected -> `NotFound` or
//!   `OperationFailed`

use chrono::Utc;
use maxun_core::{ClientConfig, MaxunError, Result};
use maxun_workflow::WorkflowFile;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::requests::{
    CreateRobotRequest, CrawlRequest, ExecuteRequest, LlmExtractRequest, RobotUpdate,
    SearchRequest,
};
use crate::results::{Run, RunResult};
use crate::types::{
    ApiResponse, CrawlConfig, ExecutionOptions, LlmExtractOptions, RobotData, ScheduleConfig,
    SearchConfig, WebhookConfig,
};

const API_KEY_HEADER: &str = "x-api-key";

const CREATE_TIMEOUT: Duration = Duration::from_secs(120);
const EXECUTE_TIMEOUT: Duration = Duration::from_secs(300);
const LLM_TIMEOUT: Duration = Duration::from_secs(300);

/// Authenticated connection to the robot API
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = config.validated()?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| MaxunError::Config(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!("Maxun client for {}", config.base_url());

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            timeout: config.timeout(),
            api_key: config.api_key,
        })
    }

    /// Build a client from `MAXUN_API_KEY` / `MAXUN_BASE_URL`
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Robots

    pub async fn get_robots(&self) -> Result<Vec<RobotData>> {
        let response: ApiResponse<Vec<RobotData>> =
            self.send(self.request(Method::GET, "/robots"), self.timeout).await?;
        Ok(response.data.unwrap_or_default())
    }

    pub async fn get_robot(&self, robot_id: &str) -> Result<RobotData> {
        let response: ApiResponse<RobotData> = self
            .send(
                self.request(Method::GET, &format!("/robots/{}", robot_id)),
                self.timeout,
            )
            .await?;
        require(response.data, || MaxunError::NotFound(format!("Robot {} not found", robot_id)))
    }

    pub async fn create_robot(&self, file: &WorkflowFile) -> Result<RobotData> {
        tracing::info!(
            "Creating robot '{}' ({} steps)",
            file.meta.name,
            file.workflow.len()
        );
        let body = CreateRobotRequest::from(file);
        let response: ApiResponse<RobotData> = self
            .send(
                self.request(Method::POST, "/robots").json(&body),
                CREATE_TIMEOUT,
            )
            .await?;
        require(response.data, || MaxunError::OperationFailed("Failed to create robot".to_string()))
    }

    pub async fn update_robot(&self, robot_id: &str, update: &RobotUpdate) -> Result<RobotData> {
        self.put_robot(robot_id, update, || format!("Failed to update robot {}", robot_id))
            .await
    }

    pub async fn delete_robot(&self, robot_id: &str) -> Result<()> {
        tracing::info!("Deleting robot {}", robot_id);
        let _: ApiResponse<serde_json::Value> = self
            .send(
                self.request(Method::DELETE, &format!("/robots/{}", robot_id)),
                self.timeout,
            )
            .await?;
        Ok(())
    }

    // Execution

    /// Run a robot synchronously and wait for its result
    pub async fn execute_robot(
        &self,
        robot_id: &str,
        options: &ExecutionOptions,
    ) -> Result<RunResult> {
        let timeout = options.timeout.unwrap_or(EXECUTE_TIMEOUT);
        tracing::info!("Executing robot {} (timeout {:?})", robot_id, timeout);

        let body = ExecuteRequest {
            params: options.params.as_ref(),
            webhook: options.webhook.as_ref(),
        };
        let response: ApiResponse<RunResult> = self
            .send(
                self.request(Method::POST, &format!("/robots/{}/execute", robot_id))
                    .json(&body),
                timeout,
            )
            .await?;
        require(response.data, || {
            MaxunError::OperationFailed("Failed to execute robot".to_string())
        })
    }

    pub async fn get_runs(&self, robot_id: &str) -> Result<Vec<Run>> {
        let response: ApiResponse<Vec<Run>> = self
            .send(
                self.request(Method::GET, &format!("/robots/{}/runs", robot_id)),
                self.timeout,
            )
            .await?;
        Ok(response.data.unwrap_or_default())
    }

    pub async fn get_run(&self, robot_id: &str, run_id: &str) -> Result<Run> {
        let response: ApiResponse<Run> = self
            .send(
                self.request(
                    Method::GET,
                    &format!("/robots/{}/runs/{}", robot_id, run_id),
                ),
                self.timeout,
            )
            .await?;
        require(response.data, || MaxunError::NotFound(format!("Run {} not found", run_id)))
    }

    pub async fn abort_run(&self, robot_id: &str, run_id: &str) -> Result<()> {
        tracing::info!("Aborting run {} of robot {}", run_id, robot_id);
        let _: ApiResponse<serde_json::Value> = self
            .send(
                self.request(
                    Method::POST,
                    &format!("/robots/{}/runs/{}/abort", robot_id, run_id),
                ),
                self.timeout,
            )
            .await?;
        Ok(())
    }

    // Scheduling

    pub async fn schedule_robot(
        &self,
        robot_id: &str,
        schedule: &ScheduleConfig,
    ) -> Result<RobotData> {
        schedule.validate()?;
        tracing::info!(
            "Scheduling robot {} every {} {}",
            robot_id,
            schedule.run_every,
            schedule.run_every_unit
        );
        self.put_robot(robot_id, &RobotUpdate::new().with_schedule(schedule.clone()), || {
            format!("Failed to schedule robot {}", robot_id)
        })
        .await
    }

    pub async fn unschedule_robot(&self, robot_id: &str) -> Result<RobotData> {
        tracing::info!("Unscheduling robot {}", robot_id);
        self.put_robot(robot_id, &RobotUpdate::new().clear_schedule(), || {
            format!("Failed to unschedule robot {}", robot_id)
        })
        .await
    }

    // Webhooks

    /// Append a webhook to the robot's list (read-modify-write)
    pub async fn add_webhook(&self, robot_id: &str, webhook: &WebhookConfig) -> Result<RobotData> {
        if webhook.url.trim().is_empty() {
            return Err(MaxunError::Validation("Webhook URL is required".to_string()));
        }

        let robot = self.get_robot(robot_id).await?;
        let mut webhooks = robot.webhooks.unwrap_or_default();
        webhooks.push(webhook.clone().into_record(Utc::now()));
        tracing::info!(
            "Adding webhook {} to robot {} ({} total)",
            webhook.url,
            robot_id,
            webhooks.len()
        );

        self.put_robot(robot_id, &RobotUpdate::new().with_webhooks(webhooks), || {
            format!("Failed to add webhook to robot {}", robot_id)
        })
        .await
    }

    pub async fn remove_webhooks(&self, robot_id: &str) -> Result<RobotData> {
        tracing::info!("Removing webhooks from robot {}", robot_id);
        self.put_robot(robot_id, &RobotUpdate::new().clear_webhooks(), || {
            format!("Failed to update robot {}", robot_id)
        })
        .await
    }

    // Server-side robot creation

    /// Create an extraction robot from a natural-language prompt.
    /// Returns the id of the new robot.
    pub async fn extract_with_llm(&self, url: &str, options: &LlmExtractOptions) -> Result<String> {
        tracing::info!("Requesting LLM extraction robot for {}", url);
        let body = LlmExtractRequest { url, options };
        let response: ApiResponse<serde_json::Value> = self
            .send(
                self.request(Method::POST, "/extract/llm").json(&body),
                LLM_TIMEOUT,
            )
            .await?;

        response
            .data
            .as_ref()
            .and_then(|data| data.get("robotId"))
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                MaxunError::OperationFailed("Failed to extract data with LLM".to_string())
            })
    }

    pub async fn create_crawl_robot(
        &self,
        url: &str,
        name: &str,
        config: &CrawlConfig,
    ) -> Result<RobotData> {
        tracing::info!("Creating crawl robot '{}' for {}", name, url);
        let body = CrawlRequest {
            url,
            name,
            crawl_config: config,
        };
        let response: ApiResponse<RobotData> = self
            .send(self.request(Method::POST, "/crawl").json(&body), CREATE_TIMEOUT)
            .await?;
        require(response.data, || {
            MaxunError::OperationFailed("Failed to create crawl robot".to_string())
        })
    }

    pub async fn create_search_robot(&self, name: &str, config: &SearchConfig) -> Result<RobotData> {
        tracing::info!("Creating search robot '{}' for query '{}'", name, config.query);
        let body = SearchRequest {
            name,
            search_config: config,
        };
        let response: ApiResponse<RobotData> = self
            .send(self.request(Method::POST, "/search").json(&body), CREATE_TIMEOUT)
            .await?;
        require(response.data, || {
            MaxunError::OperationFailed("Failed to create search robot".to_string())
        })
    }

    async fn put_robot<B, F>(&self, robot_id: &str, body: &B, failure: F) -> Result<RobotData>
    where
        B: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        let response: ApiResponse<RobotData> = self
            .send(
                self.request(Method::PUT, &format!("/robots/{}", robot_id))
                    .json(body),
                self.timeout,
            )
            .await?;
        require(response.data, || MaxunError::OperationFailed(failure()))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}{}", method, self.base_url, path);
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<ApiResponse<T>> {
        let response = request.timeout(timeout).send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::debug!("Request failed with status {}", status);
            let body = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .or_else(|| (!text.is_empty()).then(|| serde_json::Value::String(text)));
            return Err(MaxunError::from_response(status.as_u16(), body));
        }

        if text.trim().is_empty() {
            return Ok(ApiResponse::default());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Unwrap `data` from a successful response
fn require<T>(data: Option<T>, missing: impl FnOnce() -> MaxunError) -> Result<T> {
    data.ok_or_else(|| {
        let err = missing();
        tracing::warn!("Response without data: {}", err);
        err
    })
}

fn transport_error(e: reqwest::Error) -> MaxunError {
    if e.is_builder() {
        return MaxunError::Config(format!("Invalid request: {}", e));
    }
    if e.is_timeout() {
        tracing::warn!("Request timed out: {}", e);
    }
    MaxunError::Transport {
        message: e.to_string(),
        timed_out: e.is_timeout(),
    }
}
