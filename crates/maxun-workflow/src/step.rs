//! Workflow IR: steps pairing a location with the actions to run there

use maxun_core::RobotMeta;
use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionKind, LoadState};

/// Location of the sentinel bootstrap step
pub const BLANK_PAGE_URL: &str = "about:blank";

/// Browser cookie attached to a step location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Location descriptor the backend matches a page against
///
/// Keys other than `url` and `cookies` are matching conditions the backend
/// understands; they are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Where {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<Cookie>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Where {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// True for the empty location `{}`
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.cookies.is_none() && self.extra.is_empty()
    }
}

/// One where/what pair. Actions run top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "where")]
    pub location: Where,
    #[serde(rename = "what", default)]
    pub actions: Vec<Action>,
}

impl Step {
    pub fn new(location: Where) -> Self {
        Self {
            id: None,
            location,
            actions: Vec::new(),
        }
    }

    /// Bootstrap step the backend runs first: load `url` from a blank page
    /// and wait for the network to settle.
    pub fn sentinel(url: &str) -> Self {
        Self {
            id: None,
            location: Where::url(BLANK_PAGE_URL),
            actions: vec![
                Action::new(ActionKind::Goto {
                    url: url.to_string(),
                }),
                Action::new(ActionKind::WaitForLoadState {
                    state: LoadState::NetworkIdle,
                }),
            ],
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.location.url.as_deref() == Some(BLANK_PAGE_URL)
    }
}

/// Ordered sequence of steps, evaluated by the backend in document order
pub type Workflow = Vec<Step>;

/// Document submitted when creating a robot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowFile {
    pub meta: RobotMeta,
    pub workflow: Workflow,
    /// Pages a bulk robot runs its workflow against
    #[serde(
        rename = "deepExtractionUrls",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub deep_extraction_urls: Vec<String>,
}
