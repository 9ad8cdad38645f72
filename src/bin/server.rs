// Entry point for the stdio tool server

use slack_tools::core::ConfigStore;
use slack_tools::core::config::AppConfig;
use slack_tools::tools::{SlackConnector, SlackTools, StdioServer};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    slack_tools::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        anyhow::anyhow!(e)
    })?;
    info!("Using config file {}", config.config_path.display());

    let store = ConfigStore::new(config.config_path);
    let tools = SlackTools::new(store, SlackConnector::new(config.slack_api_base_url));

    StdioServer::new(tools).run().await
}
