//! # maxun-core
//!
//! Core types for the Maxun web-automation SDK.
//!
//! A *robot* is a saved, server-side automation definition: a workflow of
//! steps plus metadata, schedule and webhooks. This crate holds what every
//! other crate needs to talk about robots:
//!
//! - [`MaxunError`] and the crate-wide [`Result`] alias
//! - [`ClientConfig`] loading (file, environment, explicit)
//! - shared enums ([`RobotType`], [`RunStatus`], [`TimeUnit`], ...) and [`RobotMeta`]

pub mod config;
mod error;
mod types;

pub use config::ClientConfig;
pub use error::{MaxunError, Result, DEFAULT_API_ERROR_MESSAGE};
pub use types::*;
