//! Hub request construction.
//!
//! Every hub call is a `POST` against the configured base URL with the
//! WebSub `hub.mode` and `hub.topic` query parameters appended. Publish
//! calls carry the event payload as JSON; topic calls have no body.

use std::fmt;

use url::Url;

use crate::domain::{CorrelationId, SecurityEventTokenPayload, Topic};
use crate::error::{ClientError, ServerError};

/// Header carrying the correlation id of a hub request.
pub const CORRELATION_ID_HEADER: &str = "activityid";

pub const HUB_MODE_PARAM: &str = "hub.mode";
pub const HUB_TOPIC_PARAM: &str = "hub.topic";

const JSON_MEDIA_TYPE: &str = "application/json";

/// WebSub hub operation, sent as `hub.mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubOperation {
    Publish,
    Register,
    Deregister,
}

impl HubOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Register => "register",
            Self::Deregister => "deregister",
        }
    }
}

impl fmt::Display for HubOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build `base_url?hub.mode=<operation>&hub.topic=<topic>`.
///
/// Existing query parameters on the base URL are kept.
///
/// # Errors
///
/// [`ServerError::InvalidBaseUrl`] if `base_url` is not an absolute URL.
pub fn build_topic_url(
    topic: &Topic,
    base_url: &str,
    operation: HubOperation,
) -> Result<Url, ServerError> {
    let mut url = Url::parse(base_url).map_err(|source| ServerError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        source,
    })?;
    url.query_pairs_mut()
        .append_pair(HUB_MODE_PARAM, operation.as_str())
        .append_pair(HUB_TOPIC_PARAM, topic.as_str());
    Ok(url)
}

/// A fully built hub request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubRequest {
    url: Url,
    operation: HubOperation,
    body: Option<String>,
    correlation_id: CorrelationId,
}

impl HubRequest {
    /// Publish request carrying `payload` as its JSON body.
    ///
    /// The correlation id is reused when `correlation` holds a non-blank
    /// value, otherwise a fresh one is generated.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidPayload`] if the payload cannot be serialized.
    pub fn publish(
        url: Url,
        payload: &SecurityEventTokenPayload,
        correlation: Option<&CorrelationId>,
    ) -> Result<Self, ClientError> {
        let body = serde_json::to_string(payload).map_err(ClientError::InvalidPayload)?;
        Ok(Self {
            url,
            operation: HubOperation::Publish,
            body: Some(body),
            correlation_id: CorrelationId::reuse_or_generate(correlation),
        })
    }

    /// Register or deregister request. Carries no body.
    #[must_use]
    pub fn topic(url: Url, operation: HubOperation, correlation: Option<&CorrelationId>) -> Self {
        Self {
            url,
            operation,
            body: None,
            correlation_id: CorrelationId::reuse_or_generate(correlation),
        }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn operation(&self) -> HubOperation {
        self.operation
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    #[must_use]
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Turn into a `reqwest` request on `client`.
    pub(crate) fn into_builder(self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let builder = client
            .post(self.url)
            .header(reqwest::header::ACCEPT, JSON_MEDIA_TYPE)
            .header(reqwest::header::CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(CORRELATION_ID_HEADER, self.correlation_id.as_str());
        match self.body {
            Some(body) => builder.body(body),
            None => builder,
        }
    }
}

/// Publish request for `payload` against `url`.
///
/// Shorthand for [`HubRequest::publish`].
pub fn build_publish_request(
    url: Url,
    payload: &SecurityEventTokenPayload,
    correlation: Option<&CorrelationId>,
) -> Result<HubRequest, ClientError> {
    HubRequest::publish(url, payload, correlation)
}
