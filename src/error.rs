//! Error types for the crate.
//!
//! Hub-facing failures are split into two families:
//!
//! - [`ClientError`]: caused by the caller or by configuration (disabled
//!   adapter, missing base URL, unserializable payload, a topic that still has
//!   active subscribers).
//! - [`ServerError`]: caused by infrastructure or by the hub itself (client or
//!   TLS construction, malformed hub responses, backend status codes,
//!   transport failures).
//!
//! Both expose a stable [`code`](AdapterError::code), a short
//! [`message`](AdapterError::message) and a formatted description through
//! `Display`. Neither family is retried.

use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors caused by the caller or by adapter configuration.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("WebSub hub adapter is not enabled")]
    AdapterDisabled,

    #[error("WebSub hub base URL is not configured")]
    BaseUrlNotConfigured,

    #[error("event payload could not be serialized: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("topic {topic} cannot be deregistered, it has {count} active subscribers")]
    ActiveSubscribers { topic: String, count: String },
}

impl ClientError {
    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AdapterDisabled => "WEBSUB-60001",
            Self::BaseUrlNotConfigured => "WEBSUB-60002",
            Self::InvalidPayload(_) => "WEBSUB-60003",
            Self::ActiveSubscribers { .. } => "WEBSUB-60004",
        }
    }

    /// Short, value-free summary of the error.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::AdapterDisabled => "adapter disabled",
            Self::BaseUrlNotConfigured => "base URL not configured",
            Self::InvalidPayload(_) => "invalid payload",
            Self::ActiveSubscribers { .. } => "cannot deregister: active subscribers",
        }
    }
}

/// Errors caused by infrastructure or by the hub.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to create the async HTTP client: {0}")]
    AsyncClientCreationFailed(#[source] reqwest::Error),

    #[error("failed to create the SSL context: {reason}")]
    SslContextCreationFailed { reason: String },

    #[error("invalid WebSub hub base URL {base_url}: {source}")]
    InvalidBaseUrl {
        base_url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid response from hub for topic {topic}, operation {operation}: {body}")]
    InvalidHubResponse {
        topic: String,
        operation: String,
        body: String,
    },

    #[error("empty response from hub for topic {topic}, operation {operation}")]
    EmptyHubResponse { topic: String, operation: String },

    #[error("backend error from hub for topic {topic}, operation {operation} (status {status}): {body}")]
    HubBackendError {
        topic: String,
        operation: String,
        body: String,
        status: u16,
    },

    #[error("no pooled connection available for {route} within the request timeout")]
    ConnectionUnavailable { route: String },

    #[error("request to the hub failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("hub request was cancelled before completion")]
    Cancelled,

    #[error("failed to start the I/O runtime: {0}")]
    RuntimeUnavailable(#[source] std::io::Error),
}

impl ServerError {
    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AsyncClientCreationFailed(_) => "WEBSUB-65001",
            Self::SslContextCreationFailed { .. } => "WEBSUB-65002",
            Self::InvalidBaseUrl { .. } => "WEBSUB-65003",
            Self::InvalidHubResponse { .. } => "WEBSUB-65004",
            Self::EmptyHubResponse { .. } => "WEBSUB-65005",
            Self::HubBackendError { .. } => "WEBSUB-65006",
            Self::ConnectionUnavailable { .. } => "WEBSUB-65007",
            Self::Transport(_) => "WEBSUB-65008",
            Self::Cancelled => "WEBSUB-65009",
            Self::RuntimeUnavailable(_) => "WEBSUB-65010",
        }
    }

    /// Short, value-free summary of the error.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::AsyncClientCreationFailed(_) => "async client creation failed",
            Self::SslContextCreationFailed { .. } => "SSL context creation failed",
            Self::InvalidBaseUrl { .. } => "invalid base URL",
            Self::InvalidHubResponse { .. } => "invalid response from hub",
            Self::EmptyHubResponse { .. } => "empty response from hub",
            Self::HubBackendError { .. } => "backend error from hub",
            Self::ConnectionUnavailable { .. } => "connection unavailable",
            Self::Transport(_) => "transport failure",
            Self::Cancelled => "request cancelled",
            Self::RuntimeUnavailable(_) => "runtime unavailable",
        }
    }
}

/// Any error returned by the hub adapter.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

impl AdapterError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Client(err) => err.code(),
            Self::Server(err) => err.code(),
        }
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Client(err) => err.message(),
            Self::Server(err) => err.message(),
        }
    }

    /// Whether the caller or configuration caused the error.
    #[must_use]
    pub const fn is_client(&self) -> bool {
        matches!(self, Self::Client(_))
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ClientError> for Error {
    fn from(err: ClientError) -> Self {
        Error::Adapter(AdapterError::Client(err))
    }
}

impl From<ServerError> for Error {
    fn from(err: ServerError) -> Self {
        Error::Adapter(AdapterError::Server(err))
    }
}
