//! List capture: item selector, field selection strategy and pagination

use maxun_core::{MaxunError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Output name -> selector, kept in the order the caller gave
pub type FieldMap = serde_json::Map<String, Value>;

/// Items captured when no limit (or zero) is given
pub const DEFAULT_MAX_ITEMS: u32 = 100;

/// How the backend moves to the next batch of items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaginationType {
    ScrollDown,
    ScrollUp,
    ClickNext,
    ClickLoadMore,
}

impl std::str::FromStr for PaginationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "scrollDown" | "scroll-down" => Ok(Self::ScrollDown),
            "scrollUp" | "scroll-up" => Ok(Self::ScrollUp),
            "clickNext" | "click-next" => Ok(Self::ClickNext),
            "clickLoadMore" | "click-load-more" => Ok(Self::ClickLoadMore),
            _ => Err(format!("Invalid pagination type: {}", s)),
        }
    }
}

/// Pagination settings; a `null` selector lets the backend detect the control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(rename = "type")]
    pub pagination_type: PaginationType,
    #[serde(default)]
    pub selector: Option<String>,
}

impl Pagination {
    pub fn new(pagination_type: PaginationType) -> Self {
        Self {
            pagination_type,
            selector: None,
        }
    }

    pub fn scroll_down() -> Self {
        Self::new(PaginationType::ScrollDown)
    }

    pub fn click_next(selector: impl Into<String>) -> Self {
        Self::new(PaginationType::ClickNext).with_selector(selector)
    }

    pub fn click_load_more(selector: impl Into<String>) -> Self {
        Self::new(PaginationType::ClickLoadMore).with_selector(selector)
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into()).filter(|s: &String| !s.is_empty());
        self
    }
}

/// Field selection strategy for a list capture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListFields {
    /// Backend extracts every field with generated labels
    #[default]
    Auto,
    /// 1-based field position -> output name
    Indexed(BTreeMap<i64, String>),
    /// Output name -> selector relative to the item
    Named(FieldMap),
}

/// Caller-facing list capture request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCaptureConfig {
    pub selector: String,
    pub max_items: Option<u32>,
    pub fields: ListFields,
    pub pagination: Option<Pagination>,
}

impl ListCaptureConfig {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            max_items: None,
            fields: ListFields::Auto,
            pagination: None,
        }
    }

    pub fn max_items(mut self, max_items: u32) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Keep only the given 1-based field positions, renamed
    pub fn indexed_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        self.fields = ListFields::Indexed(fields.into_iter().map(|(i, n)| (i, n.into())).collect());
        self
    }

    pub fn named_fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.fields = ListFields::Named(field_map(fields));
        self
    }

    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Validate and lower into the wire record
    pub fn encode(self) -> Result<ListCapture> {
        if self.selector.trim().is_empty() {
            return Err(MaxunError::Validation(
                "List item selector must not be empty".to_string(),
            ));
        }

        let mut capture = ListCapture {
            item_selector: self.selector,
            max_items: self
                .max_items
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_ITEMS),
            field_index_mapping: None,
            fields: None,
            pagination: self.pagination,
        };

        match self.fields {
            ListFields::Auto => {}
            ListFields::Indexed(mapping) if mapping.is_empty() => {}
            ListFields::Indexed(mapping) => {
                capture.field_index_mapping = Some(validate_field_indexes(mapping)?);
            }
            ListFields::Named(fields) if fields.is_empty() => {}
            ListFields::Named(fields) => capture.fields = Some(fields),
        }

        Ok(capture)
    }
}

pub(crate) fn field_map<I, K, V>(fields: I) -> FieldMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), Value::String(v.into())))
        .collect()
}

fn validate_field_indexes(mapping: BTreeMap<i64, String>) -> Result<BTreeMap<u32, String>> {
    let invalid: Vec<String> = mapping
        .keys()
        .filter(|idx| u32::try_from(**idx).map_or(true, |i| i < 1))
        .map(|idx| idx.to_string())
        .collect();

    if !invalid.is_empty() {
        return Err(MaxunError::Validation(format!(
            "Invalid field indexes: {}. Field indexes must be positive integers (1-based).",
            invalid.join(", ")
        )));
    }

    Ok(mapping
        .into_iter()
        .filter_map(|(idx, name)| u32::try_from(idx).ok().map(|i| (i, name)))
        .collect())
}

/// Wire record of `scrapeList` / `scrapeListAuto`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCapture {
    pub item_selector: String,
    #[serde(default = "default_max_items")]
    pub max_items: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_index_mapping: Option<BTreeMap<u32, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

fn default_max_items() -> u32 {
    DEFAULT_MAX_ITEMS
}
