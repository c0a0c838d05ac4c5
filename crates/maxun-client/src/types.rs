//! Server resource types for the robot API

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use maxun_core::{CrawlMode, MaxunError, Result, RobotMeta, RobotType, TimeUnit};
use maxun_workflow::Workflow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const EVENT_RUN_COMPLETED: &str = "run.completed";
pub const EVENT_RUN_FAILED: &str = "run.failed";

/// Response envelope used by every endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            message: None,
        }
    }
}

/// Stored workflow of a robot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    #[serde(default)]
    pub meta: RobotMeta,
    #[serde(default)]
    pub workflow: Workflow,
}

/// Server-authoritative robot record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotData {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub recording_meta: RobotMeta,
    #[serde(default)]
    pub recording: Recording,
    #[serde(default)]
    pub google_sheet_email: Option<String>,
    #[serde(default)]
    pub google_sheet_name: Option<String>,
    #[serde(default)]
    pub airtable_base_id: Option<String>,
    #[serde(default)]
    pub airtable_table_name: Option<String>,
    #[serde(default)]
    pub n8n_webhook_url: Option<String>,
    #[serde(default)]
    pub schedule: Option<ScheduleConfig>,
    #[serde(default)]
    pub webhooks: Option<Vec<WebhookConfig>>,
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub proxy_username: Option<String>,
    #[serde(default)]
    pub proxy_password: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl RobotData {
    /// Robot id used in API paths
    pub fn robot_id(&self) -> &str {
        &self.recording_meta.id
    }

    pub fn robot_type(&self) -> Option<RobotType> {
        self.recording_meta.robot_type
    }
}

/// Anchor day for weekly schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl std::str::FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SUNDAY" | "SUN" => Ok(Self::Sunday),
            "MONDAY" | "MON" => Ok(Self::Monday),
            "TUESDAY" | "TUE" => Ok(Self::Tuesday),
            "WEDNESDAY" | "WED" => Ok(Self::Wednesday),
            "THURSDAY" | "THU" => Ok(Self::Thursday),
            "FRIDAY" | "FRI" => Ok(Self::Friday),
            "SATURDAY" | "SAT" => Ok(Self::Saturday),
            _ => Err(format!("Invalid day of week: {}", s)),
        }
    }
}

/// Periodic execution settings
///
/// `last_run_at`/`next_run_at` (and usually `cron_expression`) are computed
/// by the server; values sent from the client are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub run_every: u32,
    pub run_every_unit: TimeUnit,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_from: Option<DayOfWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_time_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_time_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run_at: Option<String>,
}

impl ScheduleConfig {
    pub fn new(run_every: u32, run_every_unit: TimeUnit, timezone: impl Into<String>) -> Self {
        Self {
            run_every,
            run_every_unit,
            timezone: timezone.into(),
            start_from: None,
            day_of_month: None,
            at_time_start: None,
            at_time_end: None,
            cron_expression: None,
            last_run_at: None,
            next_run_at: None,
        }
    }

    pub fn starting_on(mut self, day: DayOfWeek) -> Self {
        self.start_from = Some(day);
        self
    }

    pub fn on_day_of_month(mut self, day: u8) -> Self {
        self.day_of_month = Some(day);
        self
    }

    /// Restrict runs to a daily `HH:MM`-`HH:MM` window
    pub fn between(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.at_time_start = Some(start.into());
        self.at_time_end = Some(end.into());
        self
    }

    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        self.next_run_at.as_deref().and_then(parse_timestamp)
    }

    pub fn validate(&self) -> Result<()> {
        if self.run_every == 0 {
            return Err(MaxunError::Validation(
                "Schedule interval must be at least 1".to_string(),
            ));
        }
        if self.timezone.trim().is_empty() {
            return Err(MaxunError::Validation(
                "Schedule timezone is required".to_string(),
            ));
        }
        if let Some(day) = self.day_of_month {
            if !(1..=31).contains(&day) {
                return Err(MaxunError::Validation(format!(
                    "Day of month must be between 1 and 31, got {}",
                    day
                )));
            }
        }
        for time in [&self.at_time_start, &self.at_time_end].into_iter().flatten() {
            NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
                MaxunError::Validation(format!("Invalid time '{}', expected HH:MM", time))
            })?;
        }
        Ok(())
    }
}

/// Webhook subscription of a robot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Server-maintained keys (delivery stats, retry settings), sent back as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            events: Vec::new(),
            headers: BTreeMap::new(),
            active: None,
            created_at: None,
            updated_at: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Stored record for a newly added webhook
    pub(crate) fn into_record(self, now: DateTime<Utc>) -> Self {
        let timestamp = now.to_rfc3339();
        let events = if self.events.is_empty() {
            vec![EVENT_RUN_COMPLETED.to_string(), EVENT_RUN_FAILED.to_string()]
        } else {
            self.events
        };

        Self {
            id: Some(format!("webhook_{}", now.timestamp_millis())),
            url: self.url,
            events,
            headers: self.headers,
            active: Some(true),
            created_at: Some(timestamp.clone()),
            updated_at: Some(timestamp),
            extra: self.extra,
        }
    }
}

/// Per-call execution overrides
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    pub params: Option<serde_json::Map<String, serde_json::Value>>,
    pub webhook: Option<WebhookConfig>,
    /// Client-side wait for a terminal run (default 300 s)
    pub timeout: Option<Duration>,
}

impl ExecutionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params
            .get_or_insert_with(serde_json::Map::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_webhook(mut self, webhook: WebhookConfig) -> Self {
        self.webhook = Some(webhook);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Crawl scope and limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlConfig {
    pub mode: CrawlMode,
    #[serde(default)]
    pub include_paths: Vec<String>,
    #[serde(default)]
    pub exclude_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respect_robots: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_sitemap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_links: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Return result links only
    #[default]
    Discover,
    /// Also scrape every result page
    Scrape,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discover" => Ok(Self::Discover),
            "scrape" => Ok(Self::Scrape),
            _ => Err(format!("Invalid search mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(format!("Invalid time range: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    pub query: String,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl SearchConfig {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Anthropic,
    Openai,
    #[default]
    Ollama,
}

impl std::str::FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::Openai),
            "ollama" => Ok(Self::Ollama),
            _ => Err(format!("Invalid LLM provider: {}", s)),
        }
    }
}

/// Natural-language extraction request options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmExtractOptions {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<LlmProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robot_name: Option<String>,
}

impl LlmExtractOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.llm_provider = Some(provider);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = Some(model.into());
        self
    }
}

/// Parse a server timestamp: RFC 3339 first, then common locale renderings
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%m/%d/%Y, %I:%M:%S %p",
        "%m/%d/%Y, %H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}
