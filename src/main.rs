use anyhow::Result;
use notion_forwarder::config;
use notion_forwarder::server;
use notion_forwarder::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = match config::load(config::config_path()) {
        Ok(config) => config,
        Err(e) => {
            telemetry::init(telemetry::FALLBACK_DIRECTIVE, "text");
            tracing::error!("Failed to load configuration, exiting: {:#}", e);
            return Err(e);
        }
    };

    telemetry::init(&config.log_directive(), &config.log_format);
    config.print_summary();

    if let Err(e) = server::run(config).await {
        tracing::error!("Exiting: {:#}", e);
        return Err(e);
    }

    Ok(())
}
