//! # maxun-client
//!
//! Typed HTTP transport for the Maxun robot API.
//!
//! [`Client`] maps each backend endpoint to one async method and turns
//! responses into typed records ([`RobotData`], [`Run`], [`RunResult`]) or
//! a [`maxun_core::MaxunError`]. It holds no state beyond its connection
//! settings.

mod client;
mod requests;
pub mod results;
pub mod types;

pub use client::Client;
pub use requests::RobotUpdate;
pub use results::{latest_run, CrawlPage, Run, RunData, RunResult, SearchHit, SerializableOutput};
pub use types::{
    CrawlConfig, DayOfWeek, ExecutionOptions, LlmExtractOptions, LlmProvider, Recording,
    RobotData, ScheduleConfig, SearchConfig, SearchFilters, SearchMode, TimeRange, WebhookConfig,
    EVENT_RUN_COMPLETED, EVENT_RUN_FAILED,
};
