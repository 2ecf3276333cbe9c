//! Event publishing service.
//!
//! Fans one security event out to every registered [`EventPublisher`].

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::{EventContext, SecurityEventTokenPayload};
use crate::error::Result;
use crate::port::EventPublisher;

/// Registry of event publishers.
pub struct EventPublisherService {
    publishers: Vec<Arc<dyn EventPublisher>>,
}

impl EventPublisherService {
    /// Create an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            publishers: vec![],
        }
    }

    /// Register a publisher. Publishers run in registration order.
    pub fn register(&mut self, publisher: Arc<dyn EventPublisher>) {
        debug!(publisher = publisher.name(), "Event publisher registered");
        self.publishers.push(publisher);
    }

    /// Hand the event to every publisher in order.
    ///
    /// # Errors
    ///
    /// Returns the first publisher error; later publishers are skipped.
    pub async fn publish(
        &self,
        payload: &SecurityEventTokenPayload,
        context: &EventContext,
    ) -> Result<()> {
        for publisher in &self.publishers {
            if let Err(e) = publisher.publish(payload, context).await {
                error!(
                    publisher = publisher.name(),
                    tenant_domain = context.tenant_domain(),
                    event_uri = context.event_uri(),
                    error = %e,
                    "Event publisher failed"
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// Names of the registered publishers, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.publishers.iter().map(|p| p.name()).collect()
    }

    /// Number of registered publishers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    /// Check if no publisher is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }
}

impl Default for EventPublisherService {
    fn default() -> Self {
        Self::new()
    }
}
