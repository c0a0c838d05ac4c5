//! Extract facade: build extraction robots step by step, or from a prompt

use maxun_client::{Client, LlmExtractOptions};
use maxun_core::{ClientConfig, Format, Result, RobotMode, RobotType};
use maxun_workflow::{
    Action, Cookie, ListCaptureConfig, ScreenshotOptions, ScrollDirection, WorkflowBuilder,
};

use crate::robot::Robot;
use crate::{robots_of_type, submit};

#[derive(Debug, Clone)]
pub struct Extract {
    client: Client,
}

impl Extract {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_client(Client::new(config)?))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Start a new extraction workflow
    pub fn create(&self, name: impl Into<String>) -> ExtractBuilder {
        ExtractBuilder {
            client: self.client.clone(),
            inner: WorkflowBuilder::new(name, RobotType::Extract),
        }
    }

    /// Let the backend build a robot from a natural-language prompt
    pub async fn extract(&self, url: &str, options: &LlmExtractOptions) -> Result<Robot> {
        let robot_id = self.client.extract_with_llm(url, options).await?;
        let data = self.client.get_robot(&robot_id).await?;
        Ok(Robot::new(self.client.clone(), data))
    }

    /// All extract robots
    pub async fn get_robots(&self) -> Result<Vec<Robot>> {
        robots_of_type(&self.client, RobotType::Extract).await
    }

    pub async fn get_robot(&self, robot_id: &str) -> Result<Robot> {
        let data = self.client.get_robot(robot_id).await?;
        Ok(Robot::new(self.client.clone(), data))
    }

    pub async fn delete_robot(&self, robot_id: &str) -> Result<()> {
        self.client.delete_robot(robot_id).await
    }
}

/// Fluent extraction workflow bound to a client.
///
/// Nothing is sent until [`ExtractBuilder::build`].
#[derive(Debug, Clone)]
pub struct ExtractBuilder {
    client: Client,
    inner: WorkflowBuilder,
}

impl ExtractBuilder {
    pub fn navigate(self, url: impl Into<String>) -> Self {
        self.map(|b| b.navigate(url))
    }

    pub fn click(self, selector: impl Into<String>) -> Self {
        self.map(|b| b.click(selector))
    }

    pub fn type_text(self, selector: impl Into<String>, text: impl Into<String>) -> Self {
        self.map(|b| b.type_text(selector, text))
    }

    pub fn type_text_as(
        self,
        selector: impl Into<String>,
        text: impl Into<String>,
        input_type: impl Into<String>,
    ) -> Self {
        self.map(|b| b.type_text_as(selector, text, input_type))
    }

    pub fn fill(self, selector: impl Into<String>, text: impl Into<String>) -> Self {
        self.map(|b| b.fill(selector, text))
    }

    pub fn wait_for(self, selector: impl Into<String>, timeout_ms: Option<u64>) -> Self {
        self.map(|b| b.wait_for(selector, timeout_ms))
    }

    pub fn wait(self, ms: u64) -> Self {
        self.map(|b| b.wait(ms))
    }

    pub fn screenshot(self, name: Option<&str>) -> Self {
        self.map(|b| b.screenshot(name))
    }

    pub fn screenshot_with(self, name: Option<&str>, options: ScreenshotOptions) -> Self {
        self.map(|b| b.screenshot_with(name, options))
    }

    pub fn scroll(self, direction: ScrollDirection, distance: Option<u32>) -> Self {
        self.map(|b| b.scroll(direction, distance))
    }

    pub fn capture_text<I, K, V>(self, fields: I, name: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.map(|b| b.capture_text(fields, name))
    }

    pub fn capture_list(self, config: ListCaptureConfig, name: Option<&str>) -> Result<Self> {
        let Self { client, inner } = self;
        Ok(Self {
            client,
            inner: inner.capture_list(config, name)?,
        })
    }

    pub fn capture_list_auto(self, config: ListCaptureConfig, name: Option<&str>) -> Result<Self> {
        let Self { client, inner } = self;
        Ok(Self {
            client,
            inner: inner.capture_list_auto(config, name)?,
        })
    }

    pub fn set_cookies(self, cookies: Vec<Cookie>) -> Self {
        self.map(|b| b.set_cookies(cookies))
    }

    pub fn mode(self, mode: RobotMode) -> Self {
        self.map(|b| b.mode(mode))
    }

    /// Bulk mode over a list of pages
    pub fn urls<I, S>(self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map(|b| b.urls(urls))
    }

    pub fn format(self, formats: Vec<Format>) -> Self {
        self.map(|b| b.format(formats))
    }

    pub fn action(self, action: Action) -> Self {
        self.map(|b| b.action(action))
    }

    /// The workflow accumulated so far
    pub fn workflow_builder(&self) -> &WorkflowBuilder {
        &self.inner
    }

    /// Submit the workflow and return the created robot
    pub async fn build(self) -> Result<Robot> {
        submit(&self.client, self.inner.into_workflow_file()).await
    }

    fn map(self, f: impl FnOnce(WorkflowBuilder) -> WorkflowBuilder) -> Self {
        Self {
            client: self.client,
            inner: f(self.inner),
        }
    }
}
