//! Core type definitions shared by every Maxun crate

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of robot, fixed at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotType {
    Extract,
    Scrape,
    Crawl,
    Search,
}

impl std::fmt::Display for RobotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract => write!(f, "extract"),
            Self::Scrape => write!(f, "scrape"),
            Self::Crawl => write!(f, "crawl"),
            Self::Search => write!(f, "search"),
        }
    }
}

impl std::str::FromStr for RobotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "extract" => Ok(Self::Extract),
            "scrape" => Ok(Self::Scrape),
            "crawl" => Ok(Self::Crawl),
            "search" => Ok(Self::Search),
            _ => Err(format!("Invalid robot type: {}", s)),
        }
    }
}

/// Robot execution mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotMode {
    #[default]
    Normal,
    Bulk,
}

impl std::fmt::Display for RobotMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Bulk => write!(f, "bulk"),
        }
    }
}

/// Output format of a scrape robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    Markdown,
    Html,
    ScreenshotVisible,
    ScreenshotFullpage,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
            Self::ScreenshotVisible => write!(f, "screenshot-visible"),
            Self::ScreenshotFullpage => write!(f, "screenshot-fullpage"),
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "screenshot-visible" => Ok(Self::ScreenshotVisible),
            "screenshot-fullpage" => Ok(Self::ScreenshotFullpage),
            _ => Err(format!("Invalid format: {}", s)),
        }
    }
}

/// Status of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Queued,
    Running,
    Success,
    Failed,
    /// Transient: abort requested, not yet acknowledged
    Aborting,
    Aborted,
}

impl RunStatus {
    /// Finished runs never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Aborted)
    }

    /// Only queued or running runs can be aborted
    pub fn is_abortable(&self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Running => write!(f, "running"),
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Aborting => write!(f, "aborting"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Unit of a schedule interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minutes => write!(f, "MINUTES"),
            Self::Hours => write!(f, "HOURS"),
            Self::Days => write!(f, "DAYS"),
            Self::Weeks => write!(f, "WEEKS"),
            Self::Months => write!(f, "MONTHS"),
        }
    }
}

impl std::str::FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MINUTES" | "MINUTE" | "MIN" => Ok(Self::Minutes),
            "HOURS" | "HOUR" | "H" => Ok(Self::Hours),
            "DAYS" | "DAY" | "D" => Ok(Self::Days),
            "WEEKS" | "WEEK" | "W" => Ok(Self::Weeks),
            "MONTHS" | "MONTH" => Ok(Self::Months),
            _ => Err(format!("Invalid time unit: {}", s)),
        }
    }
}

/// Scope of a crawl relative to the start URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    #[default]
    Domain,
    Subdomain,
    Path,
}

impl std::str::FromStr for CrawlMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "domain" => Ok(Self::Domain),
            "subdomain" => Ok(Self::Subdomain),
            "path" => Ok(Self::Path),
            _ => Err(format!("Invalid crawl mode: {}", s)),
        }
    }
}

/// Robot metadata, generated client-side and persisted by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot_type: Option<RobotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<RobotMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<Format>>,
    /// Set for bulk robots that visit a list of URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_extraction: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_level: Option<u32>,
}

impl RobotMeta {
    pub fn new(name: impl Into<String>, robot_type: RobotType) -> Self {
        Self {
            name: name.into(),
            robot_type: Some(robot_type),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_formats(mut self, formats: Vec<Format>) -> Self {
        self.formats = Some(formats);
        self
    }

    /// Assign a fresh local id if none is set yet
    pub fn ensure_id(&mut self) -> &str {
        if self.id.is_empty() {
            self.id = generate_robot_id();
        }
        &self.id
    }
}

/// Locally unique robot id: `robot_<unix millis>_<9 random chars>`
pub fn generate_robot_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("robot_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
}
