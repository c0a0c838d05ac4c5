//! # maxun-sdk
//!
//! Entry points for Maxun web automation.
//!
//! Each facade creates and lists one kind of robot:
//!
//! - [`Extract`] - step-by-step extraction workflows, or prompt-driven
//!   robots built by the backend
//! - [`Scrape`] - whole-page markdown/HTML/screenshot capture
//! - [`Crawl`] - link-following crawls
//! - [`Search`] - web searches
//!
//! All of them hand back a [`Robot`], the proxy used to run, schedule and
//! manage the saved robot.

mod crawl;
mod extract;
mod robot;
mod scrape;
mod search;

pub use crawl::Crawl;
pub use extract::{Extract, ExtractBuilder};
pub use robot::Robot;
pub use scrape::{Scrape, ScrapeBuilder, ScrapeOptions};
pub use search::Search;

pub use maxun_client::{
    Client, CrawlConfig, ExecutionOptions, LlmExtractOptions, LlmProvider, RobotUpdate, Run,
    RunResult, ScheduleConfig, SearchConfig, WebhookConfig,
};
pub use maxun_core::{ClientConfig, MaxunError, Result, RobotType};

use maxun_workflow::WorkflowFile;

/// Robots of one type, in server order
pub(crate) async fn robots_of_type(client: &Client, robot_type: RobotType) -> Result<Vec<Robot>> {
    let robots = client.get_robots().await?;
    Ok(robots
        .into_iter()
        .filter(|r| r.robot_type() == Some(robot_type))
        .map(|r| Robot::new(client.clone(), r))
        .collect())
}

/// Assign a robot id if needed and create the robot
pub(crate) async fn submit(client: &Client, mut file: WorkflowFile) -> Result<Robot> {
    file.meta.ensure_id();
    let data = client.create_robot(&file).await?;
    tracing::info!("Created robot {} ({})", data.robot_id(), file.meta.name);
    Ok(Robot::new(client.clone(), data))
}
