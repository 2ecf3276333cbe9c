//! Event routing values: the per-call event context and the hub topic it maps to.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::correlation::CorrelationId;

/// Separator placed between tenant domain and event URI in a topic.
pub const TOPIC_SEPARATOR: &str = "/";

/// Per-event routing context supplied by the upstream dispatcher.
///
/// Built once per publish call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    tenant_domain: String,
    event_uri: String,
    correlation_id: Option<CorrelationId>,
}

impl EventContext {
    pub fn new(tenant_domain: impl Into<String>, event_uri: impl Into<String>) -> Self {
        Self {
            tenant_domain: tenant_domain.into(),
            event_uri: event_uri.into(),
            correlation_id: None,
        }
    }

    /// Attach the correlation id of the request that raised this event.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    #[must_use]
    pub fn tenant_domain(&self) -> &str {
        &self.tenant_domain
    }

    #[must_use]
    pub fn event_uri(&self) -> &str {
        &self.event_uri
    }

    #[must_use]
    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    /// The hub topic this event is published to.
    #[must_use]
    pub fn topic(&self) -> Topic {
        Topic::new(&self.tenant_domain, &self.event_uri)
    }
}

/// Hub-side channel identifier: `tenant_domain + "/" + event_uri`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic(String);

impl Topic {
    #[must_use]
    pub fn new(tenant_domain: &str, event_uri: &str) -> Self {
        Self(format!("{tenant_domain}{TOPIC_SEPARATOR}{event_uri}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
