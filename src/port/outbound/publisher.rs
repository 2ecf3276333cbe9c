//! Event publisher port.
//!
//! The upstream event router calls [`EventPublisher::publish`] once per
//! security event. Implementations hand the event to a delivery channel
//! (the WebSub hub adapter being the main one).

use async_trait::async_trait;

use crate::domain::{EventContext, SecurityEventTokenPayload};
use crate::error::Result;

/// Destination for security event token payloads.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`); the router publishes
/// from many tasks concurrently.
///
/// # Errors
///
/// [`publish`](Self::publish) returns an error only for failures detected
/// before the event is handed off (disabled publisher, bad configuration,
/// unserializable payload). Delivery outcomes are reported through telemetry.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Return the publisher name for logging.
    fn name(&self) -> &'static str;

    /// Hand off one event. Must not wait for the remote side to answer.
    async fn publish(
        &self,
        payload: &SecurityEventTokenPayload,
        context: &EventContext,
    ) -> Result<()>;
}
