//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving side: the operator CLI
//! - [`outbound`] - Driven side: the WebSub hub and telemetry sinks

pub mod inbound;
pub mod outbound;
