use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use websubhub_publisher::adapter::inbound::cli::{self, command::Cli, output};
use websubhub_publisher::infrastructure::config::Settings;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match Settings::load(&cli.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load config {}: {e}", cli.config.display());
            std::process::exit(1);
        }
    };

    settings.init_logging();
    info!(config = %cli.config.display(), "websubhub starting");

    tokio::select! {
        result = cli::execute(cli.command, &settings) => {
            if let Err(e) = result {
                error!(error = %e, "Command failed");
                output::error(&format!("{e:#}"));
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }
}
