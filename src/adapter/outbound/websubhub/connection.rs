//! Pooled HTTP client ownership for hub calls.
//!
//! The [`ConnectionManager`] owns the single `reqwest` client used for every
//! hub request, the rustls trust roots it verifies the hub against, the pool
//! caps (total and per route) and the runtime the requests run on.
//!
//! Pool slots are handed out as [`PoolPermit`]s. Checkout waits at most the
//! configured connection-request timeout; the slot is released when the
//! permit drops.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::RwLock;
use reqwest::Client;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::CertificateDer;
use tokio::runtime::{Builder as RuntimeBuilder, Handle, Runtime};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use url::Url;

use crate::error::ServerError;
use crate::infrastructure::config::AdapterConfiguration;

/// Certificates the hub's TLS chain must lead to.
///
/// An empty store means the platform's built-in roots.
#[derive(Debug, Clone, Default)]
pub struct TrustStore {
    certificates: Vec<CertificateDer<'static>>,
}

impl TrustStore {
    /// Trust the built-in web PKI roots.
    #[must_use]
    pub fn platform() -> Self {
        Self::default()
    }

    /// Trust the DER-encoded certificates given.
    #[must_use]
    pub fn from_der(certificates: Vec<Vec<u8>>) -> Self {
        Self {
            certificates: certificates.into_iter().map(CertificateDer::from).collect(),
        }
    }

    /// Trust every certificate in a PEM bundle.
    pub fn from_pem(pem: &[u8]) -> Result<Self, ServerError> {
        let certificates = CertificateDer::pem_slice_iter(pem)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServerError::SslContextCreationFailed {
                reason: format!("invalid PEM data: {e:?}"),
            })?;
        if certificates.is_empty() {
            return Err(ServerError::SslContextCreationFailed {
                reason: "trust store contains no certificates".into(),
            });
        }
        Ok(Self { certificates })
    }

    /// Read a PEM bundle from disk.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let path = path.as_ref();
        let pem = std::fs::read(path).map_err(|e| ServerError::SslContextCreationFailed {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_pem(&pem)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Build the rustls client configuration. `None` for platform roots.
    fn tls_config(&self) -> Result<Option<rustls::ClientConfig>, ServerError> {
        if self.certificates.is_empty() {
            return Ok(None);
        }

        let mut roots = rustls::RootCertStore::empty();
        for certificate in &self.certificates {
            roots
                .add(certificate.clone())
                .map_err(|e| ServerError::SslContextCreationFailed {
                    reason: e.to_string(),
                })?;
        }

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = rustls::ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| ServerError::SslContextCreationFailed {
                reason: e.to_string(),
            })?
            .with_root_certificates(roots)
            .with_no_client_auth();
        Ok(Some(config))
    }
}

/// Held for the duration of one hub request.
#[derive(Debug)]
pub struct PoolPermit {
    _total: OwnedSemaphorePermit,
    _route: OwnedSemaphorePermit,
}

/// Connection caps shared by every request.
struct ConnectionPool {
    total: Arc<Semaphore>,
    routes: DashMap<String, Arc<Semaphore>>,
    max_per_route: usize,
    checkout_timeout: Duration,
}

impl ConnectionPool {
    fn new(max_total: usize, max_per_route: usize, checkout_timeout: Duration) -> Self {
        Self {
            total: Arc::new(Semaphore::new(max_total)),
            routes: DashMap::new(),
            max_per_route,
            checkout_timeout,
        }
    }

    async fn checkout(&self, route: &str) -> Result<PoolPermit, ServerError> {
        let route_slots = self
            .routes
            .entry(route.to_owned())
            .or_insert_with(|| Arc::new(Semaphore::new(self.max_per_route)))
            .clone();
        let total_slots = Arc::clone(&self.total);

        // Route slot first: a caller queued on a full route holds no global slot.
        let acquire = async move {
            let route = route_slots.acquire_owned().await.ok()?;
            let total = total_slots.acquire_owned().await.ok()?;
            Some(PoolPermit {
                _total: total,
                _route: route,
            })
        };

        match tokio::time::timeout(self.checkout_timeout, acquire).await {
            Ok(Some(permit)) => Ok(permit),
            _ => Err(ServerError::ConnectionUnavailable {
                route: route.to_owned(),
            }),
        }
    }

    fn available(&self) -> usize {
        self.total.available_permits()
    }
}

/// Runtime the hub requests and their continuations run on.
///
/// `owned` is set when no runtime was current at startup and the manager
/// started its own.
struct Reactor {
    handle: Handle,
    owned: Option<Runtime>,
}

impl Reactor {
    fn current_or_owned() -> Result<Self, ServerError> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(Self {
                handle,
                owned: None,
            });
        }
        let runtime = RuntimeBuilder::new_multi_thread()
            .thread_name("websubhub-io")
            .enable_all()
            .build()
            .map_err(ServerError::RuntimeUnavailable)?;
        Ok(Self {
            handle: runtime.handle().clone(),
            owned: Some(runtime),
        })
    }
}

/// Client and pool handle carried by an in-flight request.
///
/// Holds no reference to the manager, so a request task never keeps the
/// manager's runtime alive.
#[derive(Clone)]
pub struct HubChannel {
    client: Client,
    pool: Arc<ConnectionPool>,
}

impl HubChannel {
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Reserve a pool slot for a request to `url`.
    pub async fn checkout(&self, url: &Url) -> Result<PoolPermit, ServerError> {
        self.pool.checkout(&route_of(url)).await
    }
}

/// Owner of the pooled hub client.
pub struct ConnectionManager {
    config: Arc<AdapterConfiguration>,
    trust_store: TrustStore,
    client: RwLock<Option<Client>>,
    pool: Arc<ConnectionPool>,
    reactor: Reactor,
}

impl ConnectionManager {
    /// Build the client and start the manager.
    ///
    /// Reuses the current tokio runtime if there is one, otherwise starts a
    /// dedicated multi-threaded runtime owned by the manager.
    ///
    /// # Errors
    ///
    /// [`ServerError::SslContextCreationFailed`] if the trust store cannot be
    /// turned into a TLS configuration, [`ServerError::AsyncClientCreationFailed`]
    /// if the client cannot be built, [`ServerError::RuntimeUnavailable`] if no
    /// runtime is current and one cannot be started.
    pub fn start(
        config: Arc<AdapterConfiguration>,
        trust_store: TrustStore,
    ) -> Result<Self, ServerError> {
        let reactor = Reactor::current_or_owned()?;

        let pool = Arc::new(ConnectionPool::new(
            config.max_connections(),
            config.max_connections_per_route(),
            config.connection_request_timeout(),
        ));

        let manager = Self {
            config,
            trust_store,
            client: RwLock::new(None),
            pool,
            reactor,
        };
        let client = manager.build_client()?;
        *manager.client.write() = Some(client);

        info!(
            max_connections = manager.config.max_connections(),
            max_connections_per_route = manager.config.max_connections_per_route(),
            trusted_certificates = manager.trust_store.len(),
            "Hub HTTP client started"
        );
        Ok(manager)
    }

    fn build_client(&self) -> Result<Client, ServerError> {
        let mut builder = Client::builder()
            .connect_timeout(self.config.connect_timeout())
            .read_timeout(self.config.read_timeout())
            .pool_max_idle_per_host(self.config.max_connections_per_route())
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("websubhub-publisher/", env!("CARGO_PKG_VERSION")));

        if let Some(tls) = self.trust_store.tls_config()? {
            debug!("Using configured trust store for hub TLS");
            builder = builder.use_preconfigured_tls(tls);
        }

        builder.build().map_err(ServerError::AsyncClientCreationFailed)
    }

    /// The running client, rebuilt first if the manager was stopped.
    pub fn client(&self) -> Result<Client, ServerError> {
        if let Some(client) = self.client.read().as_ref() {
            return Ok(client.clone());
        }

        let mut slot = self.client.write();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        debug!("Hub HTTP client is not running, starting client");
        let client = self.build_client()?;
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Snapshot of the running client and the pool for one request.
    pub fn channel(&self) -> Result<HubChannel, ServerError> {
        Ok(HubChannel {
            client: self.client()?,
            pool: Arc::clone(&self.pool),
        })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.client.read().is_some()
    }

    /// Drop the client. Idle pooled connections close; the next
    /// [`client`](Self::client) call starts a fresh one.
    pub fn stop(&self) {
        if self.client.write().take().is_some() {
            info!("Hub HTTP client stopped");
        }
    }

    /// Reserve a pool slot for a request to `url`.
    pub async fn checkout(&self, url: &Url) -> Result<PoolPermit, ServerError> {
        self.pool.checkout(&route_of(url)).await
    }

    /// Free slots in the global pool.
    #[must_use]
    pub fn available_connections(&self) -> usize {
        self.pool.available()
    }

    /// Run `task` on the manager's runtime.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.reactor.handle.spawn(task)
    }

    #[must_use]
    pub fn config(&self) -> &AdapterConfiguration {
        &self.config
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(runtime) = self.reactor.owned.take() {
            runtime.shutdown_background();
        }
    }
}

/// Pool route key: scheme, host and port.
fn route_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}
