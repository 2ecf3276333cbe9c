//! Telemetry port for hub request diagnostics.
//!
//! Two record kinds leave the adapter:
//!
//! - [`DiagnosticRecord`]: what the publisher did for an event (publishing,
//!   published, failed), keyed by url, tenant and topic.
//! - [`CorrelationRecord`]: how a single hub request ended, keyed by the
//!   correlation id sent in the request header.
//!
//! Emission is fire-and-forget and never part of a return value.

use std::fmt;
use std::time::Duration;

use crate::domain::CorrelationId;

/// Action id carried by every diagnostic record of the publish flow.
pub const PUBLISH_EVENT_ACTION: &str = "publish-event";

/// Outcome reported by a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticResult {
    Success,
    Failed,
}

impl DiagnosticResult {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// Diagnostic record for the publish flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub action: &'static str,
    pub url: String,
    pub tenant_domain: String,
    pub topic: String,
    pub result: DiagnosticResult,
    pub message: &'static str,
}

/// Terminal status of a hub request as seen by correlation logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Completed,
    Failed,
    Cancelled,
}

impl RequestStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlation record closing out one hub request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationRecord {
    pub correlation_id: CorrelationId,
    pub method: &'static str,
    pub url: String,
    pub status: RequestStatus,
    /// HTTP status code, absent when no response arrived.
    pub response_code: Option<u16>,
    /// Canonical reason phrase for `response_code`, not the phrase the hub
    /// sent. Absent for codes without one.
    pub response_phrase: Option<String>,
    /// Transport error text when no response arrived.
    pub detail: Option<String>,
    pub elapsed: Duration,
}

/// Sink for adapter telemetry.
///
/// Implementations must be thread-safe and return quickly; records are
/// emitted from completion continuations running on the I/O runtime.
pub trait Telemetry: Send + Sync {
    fn diagnostic(&self, record: DiagnosticRecord);

    fn correlation(&self, record: CorrelationRecord);
}

/// Discards every record.
pub struct NullTelemetry;

impl Telemetry for NullTelemetry {
    fn diagnostic(&self, _record: DiagnosticRecord) {}

    fn correlation(&self, _record: CorrelationRecord) {}
}
