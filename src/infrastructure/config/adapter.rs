//! WebSub hub adapter settings.
//!
//! Derived once at startup from the flat [`Properties`] set and shared
//! read-only afterwards. Numeric settings that are missing, unparsable or
//! zero fall back to their defaults. An enabled adapter without a base URL
//! is rejected here rather than on the first publish.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use super::properties::Properties;
use crate::error::ClientError;

pub const ENABLED_KEY: &str = "adapter.websubhub.enabled";
pub const BASE_URL_KEY: &str = "adapter.websubhub.baseUrl";
pub const CONNECT_TIMEOUT_KEY: &str = "adapter.websubhub.httpConnectionTimeout";
pub const READ_TIMEOUT_KEY: &str = "adapter.websubhub.httpReadTimeout";
pub const CONNECTION_REQUEST_TIMEOUT_KEY: &str = "adapter.websubhub.httpConnectionRequestTimeout";
pub const MAX_CONNECTIONS_KEY: &str = "adapter.websubhub.defaultMaxConnections";
pub const MAX_CONNECTIONS_PER_ROUTE_KEY: &str = "adapter.websubhub.defaultMaxConnectionsPerRoute";
pub const TRUST_STORE_KEY: &str = "adapter.websubhub.trustStore";
pub const DIAGNOSTIC_LOGS_KEY: &str = "adapter.websubhub.diagnosticLogs";

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 300;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 300;
pub const DEFAULT_CONNECTION_REQUEST_TIMEOUT_MS: u64 = 300;
pub const DEFAULT_MAX_CONNECTIONS: usize = 20;
pub const DEFAULT_MAX_CONNECTIONS_PER_ROUTE: usize = 20;

/// Validated adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfiguration {
    enabled: bool,
    base_url: Option<String>,
    connect_timeout: Duration,
    read_timeout: Duration,
    connection_request_timeout: Duration,
    max_connections: usize,
    max_connections_per_route: usize,
    trust_store: Option<PathBuf>,
    diagnostic_logs: bool,
}

impl AdapterConfiguration {
    /// Build from raw properties.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BaseUrlNotConfigured`] when the adapter is
    /// enabled but no base URL is set.
    pub fn from_properties(properties: &Properties) -> Result<Self, ClientError> {
        let enabled = properties
            .get(ENABLED_KEY)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));

        let base_url = if enabled {
            Some(
                properties
                    .get(BASE_URL_KEY)
                    .map(|url| url.trim().to_owned())
                    .ok_or(ClientError::BaseUrlNotConfigured)?,
            )
        } else {
            None
        };

        Ok(Self {
            enabled,
            base_url,
            connect_timeout: millis_or_default(
                properties,
                CONNECT_TIMEOUT_KEY,
                DEFAULT_CONNECT_TIMEOUT_MS,
            ),
            read_timeout: millis_or_default(properties, READ_TIMEOUT_KEY, DEFAULT_READ_TIMEOUT_MS),
            connection_request_timeout: millis_or_default(
                properties,
                CONNECTION_REQUEST_TIMEOUT_KEY,
                DEFAULT_CONNECTION_REQUEST_TIMEOUT_MS,
            ),
            max_connections: count_or_default(
                properties,
                MAX_CONNECTIONS_KEY,
                DEFAULT_MAX_CONNECTIONS,
            ),
            max_connections_per_route: count_or_default(
                properties,
                MAX_CONNECTIONS_PER_ROUTE_KEY,
                DEFAULT_MAX_CONNECTIONS_PER_ROUTE,
            ),
            trust_store: properties.get(TRUST_STORE_KEY).map(PathBuf::from),
            diagnostic_logs: properties
                .get(DIAGNOSTIC_LOGS_KEY)
                .map_or(true, |value| !value.trim().eq_ignore_ascii_case("false")),
        })
    }

    /// A disabled adapter with default settings.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            base_url: None,
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            connection_request_timeout: Duration::from_millis(
                DEFAULT_CONNECTION_REQUEST_TIMEOUT_MS,
            ),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_connections_per_route: DEFAULT_MAX_CONNECTIONS_PER_ROUTE,
            trust_store: None,
            diagnostic_logs: true,
        }
    }

    /// An enabled adapter pointing at `base_url`, other settings defaulted.
    #[must_use]
    pub fn enabled(base_url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            base_url: Some(base_url.into()),
            ..Self::disabled()
        }
    }

    #[must_use]
    pub fn with_timeouts(
        mut self,
        connect: Duration,
        read: Duration,
        connection_request: Duration,
    ) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self.connection_request_timeout = connection_request;
        self
    }

    #[must_use]
    pub fn with_pool_limits(mut self, max_connections: usize, max_per_route: usize) -> Self {
        self.max_connections = max_connections.max(1);
        self.max_connections_per_route = max_per_route.max(1);
        self
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Maximum wait for a free pooled connection.
    #[must_use]
    pub fn connection_request_timeout(&self) -> Duration {
        self.connection_request_timeout
    }

    #[must_use]
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    #[must_use]
    pub fn max_connections_per_route(&self) -> usize {
        self.max_connections_per_route
    }

    #[must_use]
    pub fn with_diagnostic_logs(mut self, enabled: bool) -> Self {
        self.diagnostic_logs = enabled;
        self
    }

    /// Whether publish diagnostics are logged. On unless set to `false`.
    #[must_use]
    pub fn diagnostic_logs_enabled(&self) -> bool {
        self.diagnostic_logs
    }

    /// PEM bundle holding the certificates the hub is trusted by.
    #[must_use]
    pub fn trust_store(&self) -> Option<&PathBuf> {
        self.trust_store.as_ref()
    }
}

fn millis_or_default(properties: &Properties, key: &'static str, default: u64) -> Duration {
    Duration::from_millis(parse_or_default(properties, key, default))
}

fn count_or_default(properties: &Properties, key: &'static str, default: usize) -> usize {
    parse_or_default(properties, key, default)
}

fn parse_or_default<T>(properties: &Properties, key: &'static str, default: T) -> T
where
    T: std::str::FromStr + PartialEq + Default + Copy + std::fmt::Display,
{
    let Some(raw) = properties.get(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => value,
        _ => {
            warn!(key, value = raw, fallback = %default, "Invalid numeric setting, using default");
            default
        }
    }
}
