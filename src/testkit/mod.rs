//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`telemetry`] - [`RecordingTelemetry`](telemetry::RecordingTelemetry),
//!   a telemetry sink that keeps every record for assertions.
//! - [`domain`] - Sample payloads and event contexts.
//! - [`config`] - Adapter configurations pointing at a test hub.

pub mod config;
pub mod domain;
pub mod telemetry;
