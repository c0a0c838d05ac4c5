//! Search facade: robots that run a web search and optionally scrape hits

use maxun_client::{Client, SearchConfig};
use maxun_core::{ClientConfig, MaxunError, Result, RobotType};

use crate::robot::Robot;
use crate::robots_of_type;

#[derive(Debug, Clone)]
pub struct Search {
    client: Client,
}

impl Search {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_client(Client::new(config)?))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn create(&self, name: &str, config: &SearchConfig) -> Result<Robot> {
        if config.query.trim().is_empty() {
            return Err(MaxunError::Validation(
                "Search query is required".to_string(),
            ));
        }

        let data = self.client.create_search_robot(name, config).await?;
        tracing::info!("Created search robot {}", data.robot_id());
        Ok(Robot::new(self.client.clone(), data))
    }

    /// All search robots
    pub async fn get_robots(&self) -> Result<Vec<Robot>> {
        robots_of_type(&self.client, RobotType::Search).await
    }
}
