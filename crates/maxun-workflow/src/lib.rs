//! # maxun-workflow
//!
//! Declarative workflow documents for Maxun robots.
//!
//! A workflow is an ordered list of [`Step`]s; each step pairs a location
//! ([`Where`]) with the [`Action`]s to perform there. [`WorkflowBuilder`]
//! accumulates steps from fluent calls and the [`encode`] functions lower
//! each call into a typed action.
//!
//! ```
//! use maxun_core::RobotType;
//! use maxun_workflow::{ListCaptureConfig, Pagination, WorkflowBuilder};
//!
//! let builder = WorkflowBuilder::new("Books", RobotType::Extract)
//!     .navigate("https://books.toscrape.com/")
//!     .capture_text([("heading", "h1")], None)
//!     .capture_list(
//!         ListCaptureConfig::new("article.product_pod")
//!             .max_items(50)
//!             .pagination(Pagination::click_next(".next a")),
//!         Some("books"),
//!     )
//!     .unwrap();
//!
//! // one content step plus the bootstrap sentinel
//! assert_eq!(builder.len(), 2);
//! ```

pub mod action;
mod builder;
pub mod encode;
pub mod list;
mod step;

pub use action::{Action, ActionKind, ScreenshotOptions, ScrollDirection, What};
pub use builder::WorkflowBuilder;
pub use list::{FieldMap, ListCapture, ListCaptureConfig, ListFields, Pagination, PaginationType};
pub use step::{Cookie, Step, Where, Workflow, WorkflowFile, BLANK_PAGE_URL};
