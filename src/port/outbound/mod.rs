//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the event delivery channel and the telemetry
//! collaborator that observes it.

pub mod publisher;
pub mod telemetry;
