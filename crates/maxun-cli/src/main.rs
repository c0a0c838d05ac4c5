//! Maxun CLI - manage web-automation robots from the terminal
//!
//! Usage:
//!   maxun robots [--type extract]        List robots
//!   maxun show <id>                      Show a robot record
//!   maxun run <id> [--timeout 600]       Run a robot and print the result
//!   maxun runs <id> [--latest]           Show run history
//!   maxun schedule <id> --every 6 --unit hours
//!   maxun webhook add <id> <url>         Subscribe a webhook
//!   maxun scrape <name> <url>            Create a scrape robot

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use maxun_client::{
    DayOfWeek, ExecutionOptions, ScheduleConfig, SearchFilters, SearchMode, TimeRange,
    WebhookConfig,
};
use maxun_core::{ClientConfig, CrawlMode, Format, RobotType, TimeUnit};
use maxun_sdk::{
    Client, Crawl, CrawlConfig, Extract, Robot, Scrape, ScrapeOptions, Search, SearchConfig,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "maxun")]
#[command(author, version, about = "Manage Maxun web-automation robots")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory containing .maxun/config.toml
    #[arg(long, default_value = ".")]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List robots
    Robots {
        /// Only robots of this type (extract, scrape, crawl, search)
        #[arg(long = "type")]
        robot_type: Option<RobotType>,
    },

    /// Show a robot record as JSON
    Show { id: String },

    /// Run a robot and wait for its result
    Run {
        id: String,

        /// Seconds to wait for a terminal state
        #[arg(long)]
        timeout: Option<u64>,

        /// Parameter override as key=value (value parsed as JSON when possible)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Show run history of a robot
    Runs {
        id: String,

        /// Only the most recently started run
        #[arg(long)]
        latest: bool,
    },

    /// Abort a queued or running run
    Abort { id: String, run_id: String },

    /// Delete a robot
    Delete { id: String },

    /// Run a robot periodically
    Schedule {
        id: String,

        #[arg(long)]
        every: u32,

        /// minutes, hours, days, weeks or months
        #[arg(long)]
        unit: TimeUnit,

        #[arg(long, default_value = "UTC")]
        timezone: String,

        #[arg(long)]
        start_from: Option<DayOfWeek>,

        #[arg(long)]
        day_of_month: Option<u8>,

        /// Daily window start (HH:MM)
        #[arg(long, requires = "window_end")]
        window_start: Option<String>,

        /// Daily window end (HH:MM)
        #[arg(long, requires = "window_start")]
        window_end: Option<String>,
    },

    /// Remove the schedule of a robot
    Unschedule { id: String },

    /// Webhook management
    Webhook {
        #[command(subcommand)]
        action: WebhookCommands,
    },

    /// Create a scrape robot
    Scrape {
        name: String,
        url: String,

        /// Output format (repeatable): markdown, html, screenshot-visible, screenshot-fullpage
        #[arg(long = "format")]
        formats: Vec<Format>,
    },

    /// Create a crawl robot
    Crawl {
        name: String,
        url: String,

        /// domain, subdomain or path
        #[arg(long)]
        mode: Option<CrawlMode>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        max_depth: Option<u32>,

        /// Path prefix to include (repeatable)
        #[arg(long = "include")]
        include_paths: Vec<String>,

        /// Path prefix to exclude (repeatable)
        #[arg(long = "exclude")]
        exclude_paths: Vec<String>,

        #[arg(long)]
        sitemap: bool,
    },

    /// Create a search robot
    Search {
        name: String,
        query: String,

        /// discover or scrape
        #[arg(long)]
        mode: Option<SearchMode>,

        #[arg(long)]
        limit: Option<u32>,

        /// day, week, month or year
        #[arg(long)]
        time_range: Option<TimeRange>,

        #[arg(long)]
        region: Option<String>,

        #[arg(long)]
        provider: Option<String>,
    },
}

#[derive(Subcommand)]
enum WebhookCommands {
    /// Add a webhook to a robot
    Add {
        id: String,
        url: String,

        /// Event to subscribe to (repeatable, default run.completed + run.failed)
        #[arg(long = "event")]
        events: Vec<String>,
    },

    /// Remove all webhooks from a robot
    Clear { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ClientConfig::load_or_default(&cli.project)
        .context("Failed to load Maxun configuration")?;
    let client = Client::new(config).context("Failed to create Maxun client")?;

    match cli.command {
        Commands::Robots { robot_type } => cmd_robots(&client, robot_type).await,
        Commands::Show { id } => print_json(open(&client, &id).await?.data()),
        Commands::Run {
            id,
            timeout,
            params,
        } => cmd_run(&client, &id, timeout, params).await,
        Commands::Runs { id, latest } => cmd_runs(&client, &id, latest).await,
        Commands::Abort { id, run_id } => {
            open(&client, &id).await?.abort(&run_id).await?;
            println!("Abort requested for run {}", run_id);
            Ok(())
        }
        Commands::Delete { id } => {
            open(&client, &id).await?.delete().await?;
            println!("Deleted robot {}", id);
            Ok(())
        }
        Commands::Schedule {
            id,
            every,
            unit,
            timezone,
            start_from,
            day_of_month,
            window_start,
            window_end,
        } => {
            let mut schedule = ScheduleConfig::new(every, unit, timezone);
            schedule.start_from = start_from;
            schedule.day_of_month = day_of_month;
            schedule.at_time_start = window_start;
            schedule.at_time_end = window_end;

            let mut robot = open(&client, &id).await?;
            robot.schedule(&schedule).await?;
            print_json(&robot.get_schedule())
        }
        Commands::Unschedule { id } => {
            open(&client, &id).await?.unschedule().await?;
            println!("Removed schedule of robot {}", id);
            Ok(())
        }
        Commands::Webhook { action } => cmd_webhook(&client, action).await,
        Commands::Scrape { name, url, formats } => {
            let robot = Scrape::from_client(client)
                .create(&name, &url, ScrapeOptions { formats })
                .await?;
            print_created(&robot)
        }
        Commands::Crawl {
            name,
            url,
            mode,
            limit,
            max_depth,
            include_paths,
            exclude_paths,
            sitemap,
        } => {
            let config = CrawlConfig {
                mode: mode.unwrap_or_default(),
                include_paths,
                exclude_paths,
                limit,
                max_depth,
                use_sitemap: sitemap.then_some(true),
                ..CrawlConfig::default()
            };
            let robot = Crawl::from_client(client).create(&name, &url, &config).await?;
            print_created(&robot)
        }
        Commands::Search {
            name,
            query,
            mode,
            limit,
            time_range,
            region,
            provider,
        } => {
            let filters = (time_range.is_some() || region.is_some())
                .then_some(SearchFilters { time_range, region });
            let config = SearchConfig {
                mode: mode.unwrap_or_default(),
                filters,
                limit,
                provider,
                ..SearchConfig::new(query)
            };
            let robot = Search::from_client(client).create(&name, &config).await?;
            print_created(&robot)
        }
    }
}

async fn open(client: &Client, id: &str) -> Result<Robot> {
    Extract::from_client(client.clone())
        .get_robot(id)
        .await
        .with_context(|| format!("Failed to load robot {}", id))
}

async fn cmd_robots(client: &Client, robot_type: Option<RobotType>) -> Result<()> {
    let robots = client.get_robots().await?;
    let robots: Vec<_> = robots
        .into_iter()
        .filter(|r| robot_type.is_none() || r.robot_type() == robot_type)
        .collect();

    if robots.is_empty() {
        println!("No robots found");
        return Ok(());
    }

    for robot in &robots {
        let kind = robot
            .robot_type()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        let scheduled = if robot.schedule.is_some() { " (scheduled)" } else { "" };
        println!(
            "{}  {:<8} {}{}",
            robot.robot_id(),
            kind,
            robot.recording_meta.name,
            scheduled
        );
    }
    Ok(())
}

async fn cmd_run(
    client: &Client,
    id: &str,
    timeout: Option<u64>,
    params: Vec<String>,
) -> Result<()> {
    let mut options = ExecutionOptions::new();
    if let Some(secs) = timeout {
        options = options.with_timeout(Duration::from_secs(secs));
    }
    for param in params {
        let Some((key, value)) = param.split_once('=') else {
            bail!("Invalid parameter '{}', expected KEY=VALUE", param);
        };
        let value = serde_json::from_str(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        options = options.with_param(key, value);
    }

    let robot = open(client, id).await?;
    info!("Running robot {} ({})", robot.id(), robot.name());
    let result = robot.run_with(&options).await?;
    print_json(&result)?;

    if !result.is_success() {
        bail!(
            "Run {} finished with status {}: {}",
            result.run_id,
            result.status,
            result.error.as_deref().unwrap_or("no error message")
        );
    }
    Ok(())
}

async fn cmd_runs(client: &Client, id: &str, latest: bool) -> Result<()> {
    let robot = open(client, id).await?;
    if latest {
        match robot.get_latest_run().await? {
            Some(run) => print_json(&run),
            None => {
                println!("Robot {} has no runs", id);
                Ok(())
            }
        }
    } else {
        print_json(&robot.get_runs().await?)
    }
}

async fn cmd_webhook(client: &Client, action: WebhookCommands) -> Result<()> {
    match action {
        WebhookCommands::Add { id, url, events } => {
            let mut robot = open(client, &id).await?;
            robot
                .add_webhook(&WebhookConfig::new(url).with_events(events))
                .await?;
            print_json(&robot.webhooks())
        }
        WebhookCommands::Clear { id } => {
            open(client, &id).await?.remove_webhooks().await?;
            println!("Removed all webhooks from robot {}", id);
            Ok(())
        }
    }
}

fn print_created(robot: &Robot) -> Result<()> {
    println!("Created robot {} ({})", robot.id(), robot.name());
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
