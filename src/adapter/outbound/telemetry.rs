//! Telemetry sink backed by `tracing`.
//!
//! Diagnostic records go to the `websubhub::diagnostic` target, correlation
//! records to `websubhub::correlation`, so either stream can be filtered or
//! routed on its own (`RUST_LOG=websubhub::correlation=info`).

use tracing::info;

use crate::port::{CorrelationRecord, DiagnosticRecord, Telemetry};

/// Emits telemetry records as structured log events.
#[derive(Debug, Clone)]
pub struct TracingTelemetry {
    diagnostics_enabled: bool,
}

impl TracingTelemetry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            diagnostics_enabled: true,
        }
    }

    /// Keep correlation records; diagnostic records only when `enabled`.
    #[must_use]
    pub const fn with_diagnostics(enabled: bool) -> Self {
        Self {
            diagnostics_enabled: enabled,
        }
    }

    #[must_use]
    pub const fn diagnostics_enabled(&self) -> bool {
        self.diagnostics_enabled
    }
}

impl Default for TracingTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry for TracingTelemetry {
    fn diagnostic(&self, record: DiagnosticRecord) {
        if !self.diagnostics_enabled {
            return;
        }
        info!(
            target: "websubhub::diagnostic",
            action = record.action,
            url = %record.url,
            tenant_domain = %record.tenant_domain,
            topic = %record.topic,
            result = record.result.as_str(),
            "{}",
            record.message
        );
    }

    fn correlation(&self, record: CorrelationRecord) {
        info!(
            target: "websubhub::correlation",
            correlation_id = %record.correlation_id,
            method = record.method,
            url = %record.url,
            status = record.status.as_str(),
            response_code = record.response_code,
            response_phrase = record.response_phrase.as_deref(),
            detail = record.detail.as_deref(),
            elapsed_ms = u64::try_from(record.elapsed.as_millis()).unwrap_or(u64::MAX),
            "Hub request finished"
        );
    }
}
