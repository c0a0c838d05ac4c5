//! Scrape facade: single-page robots that return the page as markdown,
//! HTML or screenshots

use maxun_client::Client;
use maxun_core::{ClientConfig, Format, MaxunError, Result, RobotMeta, RobotType};
use maxun_workflow::WorkflowFile;

use crate::robot::Robot;
use crate::{robots_of_type, submit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub formats: Vec<Format>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            formats: vec![Format::Markdown],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scrape {
    client: Client,
}

impl Scrape {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_client(Client::new(config)?))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Create a scrape robot for `url`
    pub async fn create(&self, name: &str, url: &str, options: ScrapeOptions) -> Result<Robot> {
        if url.trim().is_empty() {
            return Err(MaxunError::Validation("URL is required".to_string()));
        }

        let formats = if options.formats.is_empty() {
            ScrapeOptions::default().formats
        } else {
            options.formats
        };
        let meta = RobotMeta::new(name, RobotType::Scrape)
            .with_url(url)
            .with_formats(formats);

        submit(
            &self.client,
            WorkflowFile {
                meta,
                ..WorkflowFile::default()
            },
        )
        .await
    }

    /// Fluent alternative to [`Scrape::create`]
    pub fn builder(&self, name: impl Into<String>) -> ScrapeBuilder {
        ScrapeBuilder {
            client: self.client.clone(),
            name: name.into(),
            url: None,
            formats: Vec::new(),
        }
    }

    /// All scrape robots
    pub async fn get_robots(&self) -> Result<Vec<Robot>> {
        robots_of_type(&self.client, RobotType::Scrape).await
    }

    pub async fn get_robot(&self, robot_id: &str) -> Result<Robot> {
        let data = self.client.get_robot(robot_id).await?;
        Ok(Robot::new(self.client.clone(), data))
    }

    pub async fn delete_robot(&self, robot_id: &str) -> Result<()> {
        self.client.delete_robot(robot_id).await
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeBuilder {
    client: Client,
    name: String,
    url: Option<String>,
    formats: Vec<Format>,
}

impl ScrapeBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn as_markdown(self) -> Self {
        self.with_format(Format::Markdown)
    }

    pub fn as_html(self) -> Self {
        self.with_format(Format::Html)
    }

    pub fn as_screenshot_visible(self) -> Self {
        self.with_format(Format::ScreenshotVisible)
    }

    pub fn as_screenshot_fullpage(self) -> Self {
        self.with_format(Format::ScreenshotFullpage)
    }

    fn with_format(mut self, format: Format) -> Self {
        if !self.formats.contains(&format) {
            self.formats.push(format);
        }
        self
    }

    pub async fn build(self) -> Result<Robot> {
        let url = self
            .url
            .ok_or_else(|| MaxunError::Validation("URL is required".to_string()))?;
        Scrape::from_client(self.client)
            .create(&self.name, &url, ScrapeOptions { formats: self.formats })
            .await
    }
}
