//! Action encoders: high-level calls lowered into [`Action`] records
//!
//! All functions are pure. The only one that can fail is
//! [`capture_list`], which validates the field selection before anything is
//! sent anywhere.

use maxun_core::Result;

use crate::action::{Action, ActionKind, ScreenshotOptions, ScrollDirection, DEFAULT_TIMEOUT_MS};
use crate::list::{field_map, ListCaptureConfig};

/// `scrapeSchema`: field map passed through verbatim
pub fn capture_text<I, K, V>(fields: I, name: Option<String>) -> Action
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    Action::new(ActionKind::ScrapeSchema {
        fields: field_map(fields),
    })
    .with_name(name)
}

/// `scrapeList` with validated field selection
pub fn capture_list(config: ListCaptureConfig, name: Option<String>) -> Result<Action> {
    Ok(Action::new(ActionKind::ScrapeList(config.encode()?)).with_name(name))
}

/// `scrapeListAuto`: fields are detected by the backend, any explicit
/// selection in `config` is ignored
pub fn capture_list_auto(config: ListCaptureConfig, name: Option<String>) -> Result<Action> {
    let mut capture = config.encode()?;
    capture.field_index_mapping = None;
    capture.fields = None;
    Ok(Action::new(ActionKind::ScrapeListAuto(capture)).with_name(name))
}

pub fn click(selector: impl Into<String>) -> Action {
    Action::new(ActionKind::Click {
        selector: selector.into(),
    })
}

pub fn type_text(
    selector: impl Into<String>,
    text: impl Into<String>,
    input_type: Option<String>,
) -> Action {
    Action::new(ActionKind::Type {
        selector: selector.into(),
        text: text.into(),
        input_type,
    })
}

pub fn fill(selector: impl Into<String>, text: impl Into<String>) -> Action {
    Action::new(ActionKind::Fill {
        selector: selector.into(),
        text: text.into(),
    })
}

pub fn screenshot(name: Option<String>, options: ScreenshotOptions) -> Action {
    Action::new(ActionKind::Screenshot(options)).with_name(name)
}

pub fn scroll(direction: ScrollDirection, distance: Option<u32>) -> Action {
    Action::new(ActionKind::Scroll {
        direction,
        distance,
    })
}

/// `waitForSelector`, 30 s when no timeout is given
pub fn wait_for(selector: impl Into<String>, timeout_ms: Option<u64>) -> Action {
    Action::new(ActionKind::WaitForSelector {
        selector: selector.into(),
        timeout_ms: timeout_ms.filter(|t| *t > 0).unwrap_or(DEFAULT_TIMEOUT_MS),
    })
}

pub fn wait(ms: u64) -> Action {
    Action::new(ActionKind::WaitForTimeout { ms })
}
