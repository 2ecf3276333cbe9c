//! `websubhub check`: print the resolved adapter configuration.

use anyhow::Context;

use super::output;
use crate::infrastructure::config::Settings;

pub fn execute(settings: &Settings) -> anyhow::Result<()> {
    let config = settings
        .adapter()
        .context("adapter configuration is invalid")?;

    output::section("WebSub hub adapter");
    output::field("Enabled", config.is_enabled());
    output::field("Base URL", config.base_url().unwrap_or("-"));
    output::field("Connect timeout", format!("{:?}", config.connect_timeout()));
    output::field("Read timeout", format!("{:?}", config.read_timeout()));
    output::field(
        "Connection wait",
        format!("{:?}", config.connection_request_timeout()),
    );
    output::field("Max connections", config.max_connections());
    output::field("Max per route", config.max_connections_per_route());
    output::field(
        "Trust store",
        config
            .trust_store()
            .map_or_else(|| "platform roots".to_string(), |p| p.display().to_string()),
    );

    if config.is_enabled() {
        output::success("Configuration is valid");
    } else {
        output::warning("Adapter is disabled; publish and topic commands will be refused");
    }
    Ok(())
}
