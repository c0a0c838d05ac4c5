//! Fluent workflow builder
//!
//! The builder is a small state machine over the workflow IR:
//!
//! - `navigate(url)` inserts a new step for `url` at the *front* of the
//!   workflow and makes it the current step. The first call also appends a
//!   sentinel step (blank page, `goto(url)` + wait for network idle) at the
//!   *end*. Later calls never add another sentinel.
//! - Every other action is appended to the current step. Without one, an
//!   empty-location step is created first.
//! - `mode`/`format` only touch the metadata.
//!
//! After N >= 1 navigations the workflow therefore holds N content steps
//! plus exactly one sentinel.

use maxun_core::{Format, Result, RobotMeta, RobotMode, RobotType};
use std::collections::VecDeque;

use crate::action::{Action, ScreenshotOptions, ScrollDirection};
use crate::encode;
use crate::list::ListCaptureConfig;
use crate::step::{Cookie, Step, Where, Workflow, WorkflowFile};

#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
    meta: RobotMeta,
    steps: VecDeque<Step>,
    /// The current step, when present, is always the front of `steps`
    has_current: bool,
    is_first_navigation: bool,
    deep_extraction_urls: Vec<String>,
}

impl WorkflowBuilder {
    pub fn new(name: impl Into<String>, robot_type: RobotType) -> Self {
        Self {
            meta: RobotMeta::new(name, robot_type),
            steps: VecDeque::new(),
            has_current: false,
            is_first_navigation: true,
            deep_extraction_urls: Vec::new(),
        }
    }

    /// Start a new step for `url`
    pub fn navigate(mut self, url: impl Into<String>) -> Self {
        let url = url.into();

        if self.is_first_navigation {
            self.steps.push_back(Step::sentinel(&url));
            self.is_first_navigation = false;
        }

        self.steps.push_front(Step::new(Where::url(url)));
        self.has_current = true;
        self
    }

    pub fn click(self, selector: impl Into<String>) -> Self {
        self.action(encode::click(selector))
    }

    /// Type text into an input, letting the backend detect the input kind
    pub fn type_text(self, selector: impl Into<String>, text: impl Into<String>) -> Self {
        self.action(encode::type_text(selector, text, None))
    }

    /// Type text into an input of a known kind (`"password"`, `"date"`, ...)
    pub fn type_text_as(
        self,
        selector: impl Into<String>,
        text: impl Into<String>,
        input_type: impl Into<String>,
    ) -> Self {
        self.action(encode::type_text(selector, text, Some(input_type.into())))
    }

    pub fn fill(self, selector: impl Into<String>, text: impl Into<String>) -> Self {
        self.action(encode::fill(selector, text))
    }

    pub fn wait_for(self, selector: impl Into<String>, timeout_ms: Option<u64>) -> Self {
        self.action(encode::wait_for(selector, timeout_ms))
    }

    pub fn wait(self, ms: u64) -> Self {
        self.action(encode::wait(ms))
    }

    pub fn screenshot(self, name: Option<&str>) -> Self {
        self.screenshot_with(name, ScreenshotOptions::default())
    }

    pub fn screenshot_with(self, name: Option<&str>, options: ScreenshotOptions) -> Self {
        self.action(encode::screenshot(name.map(str::to_string), options))
    }

    pub fn scroll(self, direction: ScrollDirection, distance: Option<u32>) -> Self {
        self.action(encode::scroll(direction, distance))
    }

    /// Capture named text fields (`name -> CSS selector`)
    pub fn capture_text<I, K, V>(self, fields: I, name: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.action(encode::capture_text(fields, name.map(str::to_string)))
    }

    /// Capture a list of items. Fails on invalid field indexes.
    pub fn capture_list(self, config: ListCaptureConfig, name: Option<&str>) -> Result<Self> {
        let action = encode::capture_list(config, name.map(str::to_string))?;
        Ok(self.action(action))
    }

    /// Capture a list of items, letting the backend pick the fields
    pub fn capture_list_auto(self, config: ListCaptureConfig, name: Option<&str>) -> Result<Self> {
        let action = encode::capture_list_auto(config, name.map(str::to_string))?;
        Ok(self.action(action))
    }

    /// Attach cookies to the current step; no-op before any step exists
    pub fn set_cookies(mut self, cookies: Vec<Cookie>) -> Self {
        match self.current_step_mut() {
            Some(step) => step.location.cookies = Some(cookies),
            None => tracing::debug!("set_cookies called before any step; ignoring"),
        }
        self
    }

    pub fn mode(mut self, mode: RobotMode) -> Self {
        self.meta.mode = Some(mode);
        self
    }

    /// Run the workflow against each of `urls` (bulk mode)
    pub fn urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.mode = Some(RobotMode::Bulk);
        self.meta.deep_extraction = Some(true);
        self.deep_extraction_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn format(mut self, formats: Vec<Format>) -> Self {
        self.meta.formats = Some(formats);
        self
    }

    /// Append an already-encoded action to the current step
    pub fn action(mut self, action: Action) -> Self {
        if !self.has_current {
            self.steps.push_front(Step::new(Where::default()));
            self.has_current = true;
        }

        if let Some(step) = self.steps.front_mut() {
            step.actions.push(action);
        }
        self
    }

    fn current_step_mut(&mut self) -> Option<&mut Step> {
        if self.has_current {
            self.steps.front_mut()
        } else {
            None
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        if self.has_current {
            self.steps.front()
        } else {
            None
        }
    }

    pub fn meta(&self) -> &RobotMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut RobotMeta {
        &mut self.meta
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Snapshot the workflow in document order
    pub fn workflow(&self) -> Workflow {
        self.steps.iter().cloned().collect()
    }

    /// Finish building: metadata plus workflow, ready for submission
    pub fn into_workflow_file(self) -> WorkflowFile {
        WorkflowFile {
            meta: self.meta,
            workflow: self.steps.into_iter().collect(),
            deep_extraction_urls: self.deep_extraction_urls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::list::ListCaptureConfig;
    use crate::step::BLANK_PAGE_URL;

    fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new("test", RobotType::Extract)
    }

    #[test]
    fn test_first_navigation_adds_sentinel_at_end() {
        let wf = builder().navigate("https://a.example").workflow();

        assert_eq!(wf.len(), 2);
        assert_eq!(wf[0].location.url.as_deref(), Some("https://a.example"));
        assert!(wf[0].actions.is_empty());
        assert!(wf[1].is_sentinel());
        assert_eq!(
            wf[1].actions[0].kind,
            ActionKind::Goto {
                url: "https://a.example".to_string()
            }
        );
        assert_eq!(wf[1].actions[1].action_name(), "waitForLoadState");
    }

    #[test]
    fn test_later_navigations_insert_at_front_without_sentinel() {
        let wf = builder()
            .navigate("https://a.example")
            .navigate("https://b.example")
            .navigate("https://c.example")
            .workflow();

        assert_eq!(wf.len(), 3 + 1);
        assert_eq!(wf[0].location.url.as_deref(), Some("https://c.example"));
        assert_eq!(wf[1].location.url.as_deref(), Some("https://b.example"));
        assert_eq!(wf[2].location.url.as_deref(), Some("https://a.example"));
        assert_eq!(wf.iter().filter(|s| s.is_sentinel()).count(), 1);
        assert!(wf[3].is_sentinel());
    }

    #[test]
    fn test_actions_append_in_call_order() {
        let wf = builder()
            .navigate("https://a.example")
            .click("#one")
            .type_text("#q", "rust")
            .wait(500)
            .scroll(ScrollDirection::Down, Some(300))
            .navigate("https://b.example")
            .click("#two")
            .workflow();

        let names: Vec<_> = wf[1].actions.iter().map(|a| a.action_name()).collect();
        assert_eq!(names, vec!["click", "type", "waitForTimeout", "scroll"]);
        assert_eq!(wf[0].actions.len(), 1);
        assert_eq!(
            wf[0].actions[0].kind,
            ActionKind::Click {
                selector: "#two".to_string()
            }
        );
    }

    #[test]
    fn test_action_before_navigation_creates_empty_step() {
        let b = builder().click("#accept");
        let wf = b.workflow();
        assert_eq!(wf.len(), 1);
        assert!(wf[0].location.is_empty());
        assert_eq!(wf[0].actions.len(), 1);
    }

    #[test]
    fn test_set_cookies_targets_current_step() {
        let wf = builder()
            .set_cookies(vec![Cookie::new("ignored", "1")])
            .navigate("https://a.example")
            .set_cookies(vec![Cookie::new("session", "abc").with_domain(".a.example")])
            .workflow();

        let cookies = wf[0].location.cookies.as_ref().unwrap();
        assert_eq!(cookies[0].name, "session");
        assert!(wf[1].location.cookies.is_none());
        assert_eq!(wf[1].location.url.as_deref(), Some(BLANK_PAGE_URL));
    }

    #[test]
    fn test_capture_list_invalid_index_fails_fast() {
        let result = builder()
            .navigate("https://a.example")
            .capture_list(ListCaptureConfig::new("li").indexed_fields([(0, "x")]), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_capture_list_appends() {
        let b = builder()
            .navigate("https://a.example")
            .capture_list(
                ListCaptureConfig::new("li").indexed_fields([(1, "x"), (2, "y")]),
                Some("items"),
            )
            .unwrap();
        let step = b.current_step().unwrap();
        assert_eq!(step.actions[0].action_name(), "scrapeList");
        assert_eq!(step.actions[0].name.as_deref(), Some("items"));
    }

    #[test]
    fn test_mode_and_format_touch_only_meta() {
        let b = builder()
            .mode(RobotMode::Bulk)
            .format(vec![Format::Markdown, Format::Html]);
        assert!(b.is_empty());
        assert_eq!(b.meta().mode, Some(RobotMode::Bulk));
        assert_eq!(b.meta().formats.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_urls_switches_to_bulk() {
        let file = builder()
            .navigate("https://a.example/1")
            .capture_text([("title", "h1")], None)
            .urls(["https://a.example/2", "https://a.example/3"])
            .into_workflow_file();
        assert_eq!(file.meta.mode, Some(RobotMode::Bulk));
        assert_eq!(file.meta.deep_extraction, Some(true));
        assert_eq!(file.deep_extraction_urls.len(), 2);
        assert_eq!(file.workflow.len(), 2);

        let wire = serde_json::to_value(&file).unwrap();
        assert_eq!(wire["meta"]["deepExtraction"], true);
        assert_eq!(wire["deepExtractionUrls"][1], "https://a.example/3");
    }

    #[test]
    fn test_into_workflow_file() {
        let file = builder()
            .navigate("https://a.example")
            .capture_text([("title", "h1")], None)
            .into_workflow_file();
        assert_eq!(file.meta.name, "test");
        assert_eq!(file.meta.robot_type, Some(RobotType::Extract));
        assert_eq!(file.workflow.len(), 2);
    }
}
