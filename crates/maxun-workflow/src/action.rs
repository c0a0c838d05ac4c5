//! Typed action union and its wire encoding
//!
//! On the wire every action is `{action, args, name?, actionId?}` where the
//! shape of `args` depends on `action`. Here each action name is its own
//! variant with a typed parameter record; the untyped form ([`What`]) only
//! exists at the serialization boundary.
//!
//! Actions coming back from the server that are unknown, or whose arguments
//! carry anything the typed record would not re-emit exactly, are kept
//! verbatim as [`ActionKind::Raw`] so a fetched robot always round-trips.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::list::{FieldMap, ListCapture};

/// Default timeout for selector waits and screenshots (ms)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Untyped wire form of an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct What {
    pub action: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "actionId", default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
}

/// A single action with its optional human label and id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "What", from = "What")]
pub struct Action {
    pub kind: ActionKind,
    pub name: Option<String>,
    pub action_id: Option<String>,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            name: None,
            action_id: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_action_id(mut self, action_id: impl Into<String>) -> Self {
        self.action_id = Some(action_id.into());
        self
    }

    /// Wire action name
    pub fn action_name(&self) -> &str {
        self.kind.action_name()
    }
}

/// Page load milestone to wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Load,
    DomContentLoaded,
    NetworkIdle,
}

/// Scroll target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Top,
    Bottom,
}

impl std::str::FromStr for ScrollDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(format!("Invalid scroll direction: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    Png,
    Jpeg,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Caret {
    #[default]
    Hide,
    Initial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Css,
    #[default]
    Device,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animations {
    Disabled,
    #[default]
    Allow,
}

/// Screenshot capture options
///
/// Override individual fields with struct update syntax:
/// `ScreenshotOptions { full_page: false, ..Default::default() }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenshotOptions {
    #[serde(rename = "type")]
    pub image_type: ImageType,
    pub caret: Caret,
    pub scale: Scale,
    /// Capture timeout in milliseconds
    pub timeout: u64,
    /// Capture the whole scrollable page instead of the viewport
    pub full_page: bool,
    pub animations: Animations,
    /// JPEG quality (1-100), ignored for PNG
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
}

impl Default for ScreenshotOptions {
    fn default() -> Self {
        Self {
            image_type: ImageType::Png,
            caret: Caret::Hide,
            scale: Scale::Device,
            timeout: DEFAULT_TIMEOUT_MS,
            full_page: true,
            animations: Animations::Allow,
            quality: None,
        }
    }
}

impl ScreenshotOptions {
    /// Options for a viewport-only capture
    pub fn visible() -> Self {
        Self {
            full_page: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WaitArgs {
    timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScrollArgs {
    direction: ScrollDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distance: Option<u32>,
}

/// Action vocabulary with typed parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    Goto {
        url: String,
    },
    WaitForLoadState {
        state: LoadState,
    },
    Click {
        selector: String,
    },
    /// Type into an input; `input_type` is auto-detected by the backend when absent
    Type {
        selector: String,
        text: String,
        input_type: Option<String>,
    },
    Fill {
        selector: String,
        text: String,
    },
    WaitForSelector {
        selector: String,
        timeout_ms: u64,
    },
    WaitForTimeout {
        ms: u64,
    },
    Screenshot(ScreenshotOptions),
    Scroll {
        direction: ScrollDirection,
        distance: Option<u32>,
    },
    /// Logical field name -> CSS selector
    ScrapeSchema {
        fields: FieldMap,
    },
    ScrapeList(ListCapture),
    ScrapeListAuto(ListCapture),
    /// Action kept in wire form
    Raw {
        action: String,
        args: Vec<Value>,
    },
}

impl ActionKind {
    pub fn action_name(&self) -> &str {
        match self {
            Self::Goto { .. } => "goto",
            Self::WaitForLoadState { .. } => "waitForLoadState",
            Self::Click { .. } => "click",
            Self::Type { .. } => "type",
            Self::Fill { .. } => "fill",
            Self::WaitForSelector { .. } => "waitForSelector",
            Self::WaitForTimeout { .. } => "waitForTimeout",
            Self::Screenshot(_) => "screenshot",
            Self::Scroll { .. } => "scroll",
            Self::ScrapeSchema { .. } => "scrapeSchema",
            Self::ScrapeList(_) => "scrapeList",
            Self::ScrapeListAuto(_) => "scrapeListAuto",
            Self::Raw { action, .. } => action,
        }
    }

    /// Positional argument list for the wire form
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::Goto { url } => vec![Value::from(url.as_str())],
            Self::WaitForLoadState { state } => vec![to_arg(state)],
            Self::Click { selector } => vec![Value::from(selector.as_str())],
            Self::Type {
                selector,
                text,
                input_type,
            } => {
                let mut args = vec![Value::from(selector.as_str()), Value::from(text.as_str())];
                if let Some(input_type) = input_type {
                    args.push(Value::from(input_type.as_str()));
                }
                args
            }
            Self::Fill { selector, text } => {
                vec![Value::from(selector.as_str()), Value::from(text.as_str())]
            }
            Self::WaitForSelector {
                selector,
                timeout_ms,
            } => vec![
                Value::from(selector.as_str()),
                to_arg(&WaitArgs {
                    timeout: *timeout_ms,
                }),
            ],
            Self::WaitForTimeout { ms } => vec![Value::from(*ms)],
            Self::Screenshot(options) => vec![to_arg(options)],
            Self::Scroll {
                direction,
                distance,
            } => vec![to_arg(&ScrollArgs {
                direction: *direction,
                distance: *distance,
            })],
            Self::ScrapeSchema { fields } => vec![to_arg(fields)],
            Self::ScrapeList(capture) | Self::ScrapeListAuto(capture) => vec![to_arg(capture)],
            Self::Raw { args, .. } => args.clone(),
        }
    }

    /// Typed decode of a wire action; `None` when the name is unknown or the
    /// arguments do not match the expected shape.
    fn decode(action: &str, args: &[Value]) -> Option<Self> {
        let str_arg = |i: usize| args.get(i).and_then(Value::as_str).map(str::to_string);
        let parsed = |i: usize| args.get(i).cloned();

        match action {
            "goto" => Some(Self::Goto { url: str_arg(0)? }),
            "waitForLoadState" => serde_json::from_value(parsed(0)?)
                .ok()
                .map(|state| Self::WaitForLoadState { state }),
            "click" => Some(Self::Click {
                selector: str_arg(0)?,
            }),
            "type" => Some(Self::Type {
                selector: str_arg(0)?,
                text: str_arg(1)?,
                input_type: str_arg(2),
            }),
            "fill" => Some(Self::Fill {
                selector: str_arg(0)?,
                text: str_arg(1)?,
            }),
            "waitForSelector" => Some(Self::WaitForSelector {
                selector: str_arg(0)?,
                timeout_ms: args
                    .get(1)
                    .and_then(|v| v.get("timeout"))
                    .and_then(Value::as_u64)
                    .unwrap_or(DEFAULT_TIMEOUT_MS),
            }),
            "waitForTimeout" => Some(Self::WaitForTimeout {
                ms: args.first()?.as_u64()?,
            }),
            "screenshot" => match parsed(0) {
                None => Some(Self::Screenshot(ScreenshotOptions::default())),
                Some(value) => serde_json::from_value(value).ok().map(Self::Screenshot),
            },
            "scroll" => serde_json::from_value::<ScrollArgs>(parsed(0)?)
                .ok()
                .map(|s| Self::Scroll {
                    direction: s.direction,
                    distance: s.distance,
                }),
            "scrapeSchema" => serde_json::from_value(parsed(0)?)
                .ok()
                .map(|fields| Self::ScrapeSchema { fields }),
            "scrapeList" => serde_json::from_value(parsed(0)?).ok().map(Self::ScrapeList),
            "scrapeListAuto" => serde_json::from_value(parsed(0)?)
                .ok()
                .map(Self::ScrapeListAuto),
            _ => None,
        }
    }
}

fn to_arg<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

impl From<Action> for What {
    fn from(action: Action) -> Self {
        Self {
            action: action.kind.action_name().to_string(),
            args: action.kind.args(),
            name: action.name,
            action_id: action.action_id,
        }
    }
}

impl From<What> for Action {
    fn from(what: What) -> Self {
        let kind = ActionKind::decode(&what.action, &what.args)
            .filter(|kind| kind.args() == what.args)
            .unwrap_or_else(|| {
                tracing::debug!("Keeping action '{}' in wire form", what.action);
                ActionKind::Raw {
                    action: what.action,
                    args: what.args,
                }
            });

        Self {
            kind,
            name: what.name,
            action_id: what.action_id,
        }
    }
}
