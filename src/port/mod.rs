//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   upstream event router
//!            │
//!            ▼
//!   ┌──────────────────┐       ┌────────────────┐
//!   │  EventPublisher  │──────▶│   Telemetry    │
//!   │ (WebSub adapter) │       │ (logs, diag.)  │
//!   └──────────────────┘       └────────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`EventPublisher`] - Delivery channel for security event tokens
//! - [`Telemetry`] - Diagnostic and correlation records

pub mod outbound;

pub use outbound::publisher::EventPublisher;
pub use outbound::telemetry::{
    CorrelationRecord, DiagnosticRecord, DiagnosticResult, NullTelemetry, RequestStatus,
    Telemetry, PUBLISH_EVENT_ACTION,
};
