//! Run records and execution results
//!
//! Result payloads are loosely shaped on the wire: crawl and search data
//! arrive either as a flat array or as an object keyed by capture name. The
//! accessors on [`RunData`] flatten both forms.

use chrono::{DateTime, Utc};
use maxun_core::RunStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::types::parse_timestamp;

/// Output captured during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_list: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single execution of a robot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(default)]
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub robot_meta_id: String,
    #[serde(default)]
    pub run_id: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub serializable_output: Option<SerializableOutput>,
    #[serde(default)]
    pub binary_output: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Run {
    pub fn started_at_utc(&self) -> Option<DateTime<Utc>> {
        self.started_at.as_deref().and_then(parse_timestamp)
    }

    pub fn finished_at_utc(&self) -> Option<DateTime<Utc>> {
        self.finished_at.as_deref().and_then(parse_timestamp)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Pick the most recently started run. Ties keep list order.
pub fn latest_run(runs: Vec<Run>) -> Option<Run> {
    runs.into_iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            a.started_at_utc()
                .cmp(&b.started_at_utc())
                .then_with(|| ib.cmp(ia))
        })
        .map(|(_, run)| run)
}

/// Data returned by a synchronous execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawl_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_output: Option<BTreeMap<String, Value>>,
}

/// A crawled page, flattened from `crawlData`
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlPage {
    pub url: Option<String>,
    pub title: Option<String>,
    pub word_count: Option<u64>,
    pub raw: Value,
}

impl CrawlPage {
    fn from_value(raw: Value) -> Self {
        let metadata = raw.get("metadata");
        let url = metadata
            .and_then(|m| m.get("url"))
            .or_else(|| raw.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let title = metadata
            .and_then(|m| m.get("title"))
            .or_else(|| raw.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let word_count = raw.get("wordCount").and_then(Value::as_u64);

        Self {
            url,
            title,
            word_count,
            raw,
        }
    }
}

/// A search hit, flattened from `searchData`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub raw: Value,
}

impl SearchHit {
    fn from_value(raw: Value) -> Self {
        let field = |name: &str| raw.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            title: field("title"),
            url: field("url"),
            description: field("description"),
            raw,
        }
    }
}

impl RunData {
    /// Captured text fields, when the run produced an object
    pub fn text_fields(&self) -> Option<&Map<String, Value>> {
        self.text_data.as_ref().and_then(Value::as_object)
    }

    /// All list items across every list capture
    pub fn list_items(&self) -> Vec<Value> {
        self.list_data.as_ref().map(flatten_items).unwrap_or_default()
    }

    pub fn crawl_pages(&self) -> Vec<CrawlPage> {
        self.crawl_data
            .as_ref()
            .map(flatten_items)
            .unwrap_or_default()
            .into_iter()
            .map(CrawlPage::from_value)
            .collect()
    }

    pub fn search_results(&self) -> Vec<SearchHit> {
        self.search_data
            .as_ref()
            .map(flatten_items)
            .unwrap_or_default()
            .into_iter()
            .map(SearchHit::from_value)
            .collect()
    }
}

/// Flatten an array, or an object of arrays / `{results: [...]}` groups
fn flatten_items(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(groups) => groups
            .values()
            .flat_map(|group| match group {
                Value::Array(items) => items.clone(),
                Value::Object(inner) => match inner.get("results") {
                    Some(Value::Array(items)) => items.clone(),
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Result of a synchronous execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    #[serde(default)]
    pub data: RunData,
    #[serde(default)]
    pub screenshots: Vec<Value>,
    pub status: RunStatus,
    #[serde(default)]
    pub run_id: String,
    /// Backend error message of a failed run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}
