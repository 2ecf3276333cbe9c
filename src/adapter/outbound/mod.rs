//! Outbound adapters (driven side).

pub mod telemetry;
pub mod websubhub;
