//! Composition root: settings in, wired publishers out.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::telemetry::TracingTelemetry;
use crate::adapter::outbound::websubhub::WebSubHubAdapter;
use crate::application::publisher::EventPublisherService;
use crate::error::Result;
use crate::infrastructure::config::settings::Settings;
use crate::infrastructure::config::AdapterConfiguration;
use crate::port::Telemetry;

/// Build the WebSub hub adapter from settings.
///
/// Uses [`TracingTelemetry`] unless the host supplies its own sink.
pub fn build_websubhub_adapter(
    settings: &Settings,
    telemetry: Option<Arc<dyn Telemetry>>,
) -> Result<WebSubHubAdapter> {
    let config = settings.adapter()?;
    let telemetry = telemetry.unwrap_or_else(|| Arc::new(default_telemetry(&config)));
    Ok(WebSubHubAdapter::new(config, telemetry)?)
}

fn default_telemetry(config: &AdapterConfiguration) -> TracingTelemetry {
    TracingTelemetry::with_diagnostics(config.diagnostic_logs_enabled())
}

/// Build the publisher service with every configured publisher registered.
pub fn build_publisher_service(
    settings: &Settings,
    telemetry: Option<Arc<dyn Telemetry>>,
) -> Result<EventPublisherService> {
    let adapter = build_websubhub_adapter(settings, telemetry)?;
    let mut service = EventPublisherService::new();
    service.register(Arc::new(adapter));
    info!(publishers = ?service.names(), "Event publishers ready");
    Ok(service)
}
