//! Crawl facade: robots that follow links from a start URL

use maxun_client::{Client, CrawlConfig};
use maxun_core::{ClientConfig, MaxunError, Result, RobotType};

use crate::robot::Robot;
use crate::robots_of_type;

#[derive(Debug, Clone)]
pub struct Crawl {
    client: Client,
}

impl Crawl {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_client(Client::new(config)?))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Create a crawl robot starting at `url`
    pub async fn create(&self, name: &str, url: &str, config: &CrawlConfig) -> Result<Robot> {
        if url.trim().is_empty() {
            return Err(MaxunError::Validation("URL is required".to_string()));
        }
        if config.limit == Some(0) {
            return Err(MaxunError::Validation(
                "Crawl limit must be at least 1".to_string(),
            ));
        }

        let data = self.client.create_crawl_robot(url, name, config).await?;
        tracing::info!("Created crawl robot {}", data.robot_id());
        Ok(Robot::new(self.client.clone(), data))
    }

    /// All crawl robots
    pub async fn get_robots(&self) -> Result<Vec<Robot>> {
        robots_of_type(&self.client, RobotType::Crawl).await
    }
}
