use tracing::info;

use vc_scrape_gateway::server;
use vc_scrape_gateway::settings::Settings;
use vc_scrape_gateway::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    info!("Starting vc-scrape-gateway...");

    let settings = Settings::new()?;
    info!("Configuration loaded");

    server::run_server(&settings).await
}
