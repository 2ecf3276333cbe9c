//! WebSub hub adapter.
//!
//! Publishes security event tokens to a WebSub hub and manages the hub
//! topics they are published to. One [`WebSubHubAdapter`] owns one pooled
//! HTTP client and can be cloned freely; clones share the client, the pool
//! and the telemetry sink.
//!
//! - [`dispatch`](WebSubHubAdapter::dispatch) / [`EventPublisher::publish`]:
//!   fire-and-forget publish. Delivery is reported through telemetry.
//! - [`register_topic`](WebSubHubAdapter::register_topic) /
//!   [`deregister_topic`](WebSubHubAdapter::deregister_topic): return the
//!   classified hub outcome to the caller.
//!
//! [`EventPublisher::publish`]: crate::port::EventPublisher::publish

pub mod connection;
pub mod dispatch;
pub mod publisher;
pub mod request;
pub mod response;
pub mod topic;

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

pub use connection::{ConnectionManager, TrustStore};
pub use publisher::{Dispatch, PublishOutcome};
pub use request::{build_publish_request, build_topic_url, HubOperation, HubRequest};
pub use response::TopicOutcome;

use crate::error::{ClientError, ServerError};
use crate::infrastructure::config::AdapterConfiguration;
use crate::port::Telemetry;

/// State shared by every clone of the adapter.
struct Shared {
    config: Arc<AdapterConfiguration>,
    connections: ConnectionManager,
    telemetry: Arc<dyn Telemetry>,
    base_url: OnceLock<String>,
}

/// WebSub hub adapter.
#[derive(Clone)]
pub struct WebSubHubAdapter {
    inner: Arc<Shared>,
}

impl WebSubHubAdapter {
    /// Start the adapter.
    ///
    /// When enabled and a trust store path is configured, hub certificates
    /// are verified against that PEM bundle; otherwise against the platform
    /// roots.
    ///
    /// # Errors
    ///
    /// Fails when the trust store or the HTTP client cannot be built.
    pub fn new(
        config: AdapterConfiguration,
        telemetry: Arc<dyn Telemetry>,
    ) -> Result<Self, ServerError> {
        let trust_store = match config.trust_store() {
            Some(path) if config.is_enabled() => TrustStore::from_pem_file(path)?,
            _ => TrustStore::platform(),
        };
        Self::with_trust_store(config, trust_store, telemetry)
    }

    /// Start the adapter with an explicit trust store.
    pub fn with_trust_store(
        config: AdapterConfiguration,
        trust_store: TrustStore,
        telemetry: Arc<dyn Telemetry>,
    ) -> Result<Self, ServerError> {
        let config = Arc::new(config);
        let connections = ConnectionManager::start(Arc::clone(&config), trust_store)?;

        info!(
            enabled = config.is_enabled(),
            base_url = config.base_url().unwrap_or("-"),
            "WebSub hub adapter started"
        );

        Ok(Self {
            inner: Arc::new(Shared {
                config,
                connections,
                telemetry,
                base_url: OnceLock::new(),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdapterConfiguration {
        &self.inner.config
    }

    #[must_use]
    pub fn connections(&self) -> &ConnectionManager {
        &self.inner.connections
    }

    /// Stop the HTTP client. The next hub call restarts it.
    pub fn stop(&self) {
        self.inner.connections.stop();
    }

    fn ensure_enabled(&self) -> Result<(), ClientError> {
        if self.inner.config.is_enabled() {
            Ok(())
        } else {
            Err(ClientError::AdapterDisabled)
        }
    }

    /// Hub base URL, resolved on first use and cached.
    fn base_url(&self) -> Result<&str, ClientError> {
        if let Some(url) = self.inner.base_url.get() {
            return Ok(url);
        }
        let url = self
            .inner
            .config
            .base_url()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ClientError::BaseUrlNotConfigured)?;
        debug!(base_url = url, "Resolved hub base URL");
        Ok(self.inner.base_url.get_or_init(|| url.to_owned()))
    }

    fn telemetry(&self) -> Arc<dyn Telemetry> {
        Arc::clone(&self.inner.telemetry)
    }
}
