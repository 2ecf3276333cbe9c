//! Fire-and-forget event publishing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::connection::HubChannel;
use super::dispatch::{execute, CorrelationScope};
use super::request::{build_topic_url, HubOperation, HubRequest};
use super::response::is_publish_success;
use super::WebSubHubAdapter;
use crate::domain::{CorrelationId, EventContext, SecurityEventTokenPayload};
use crate::error::{AdapterError, Result};
use crate::port::{
    DiagnosticRecord, DiagnosticResult, EventPublisher, RequestStatus, Telemetry,
    PUBLISH_EVENT_ACTION,
};

const PUBLISHING_MESSAGE: &str = "Publishing event data to WebSubHub.";
const PUBLISHED_MESSAGE: &str = "Event data published to WebSubHub.";
const PUBLISH_FAILED_MESSAGE: &str = "Failed to publish event data to WebSubHub.";

/// How a dispatched publish ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The hub answered with one of the accepted success codes.
    Delivered { status: u16 },
    /// The hub answered with any other status.
    Rejected { status: u16, body: String },
    /// No response arrived: connect, read or pool checkout failure.
    TransportFailed { reason: String },
    /// The request task was dropped before it finished.
    Cancelled,
}

impl PublishOutcome {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// A submitted publish request.
///
/// Dropping a `Dispatch` does not cancel the request.
#[derive(Debug)]
pub struct Dispatch {
    correlation_id: CorrelationId,
    handle: JoinHandle<PublishOutcome>,
}

impl Dispatch {
    /// Correlation id sent with the request.
    #[must_use]
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Wait for the classified outcome.
    pub async fn outcome(self) -> PublishOutcome {
        self.handle.await.unwrap_or(PublishOutcome::Cancelled)
    }
}

/// Everything the completion continuation needs, detached from the adapter.
struct PublishTask {
    telemetry: Arc<dyn Telemetry>,
    url: String,
    tenant_domain: String,
    topic: String,
}

impl PublishTask {
    fn diagnostic(&self, result: DiagnosticResult, message: &'static str) {
        self.telemetry.diagnostic(DiagnosticRecord {
            action: PUBLISH_EVENT_ACTION,
            url: self.url.clone(),
            tenant_domain: self.tenant_domain.clone(),
            topic: self.topic.clone(),
            result,
            message,
        });
    }

    async fn run(self, channel: HubChannel, request: HubRequest) -> PublishOutcome {
        let scope = CorrelationScope::open(Arc::clone(&self.telemetry), &request);

        match execute(&channel, request).await {
            Ok(reply) if is_publish_success(reply.status) => {
                scope.responded(RequestStatus::Completed, &reply);
                debug!(
                    topic = %self.topic,
                    status = reply.status,
                    body = %reply.body,
                    "Event published to hub"
                );
                self.diagnostic(DiagnosticResult::Success, PUBLISHED_MESSAGE);
                PublishOutcome::Delivered {
                    status: reply.status,
                }
            }
            Ok(reply) => {
                scope.responded(RequestStatus::Completed, &reply);
                error!(
                    topic = %self.topic,
                    status = reply.status,
                    body = %reply.body,
                    "Hub rejected published event"
                );
                self.diagnostic(DiagnosticResult::Failed, PUBLISH_FAILED_MESSAGE);
                PublishOutcome::Rejected {
                    status: reply.status,
                    body: reply.body,
                }
            }
            Err(e) => {
                scope.failed(&e);
                error!(topic = %self.topic, error = %e, "Publishing event to hub failed");
                self.diagnostic(DiagnosticResult::Failed, PUBLISH_FAILED_MESSAGE);
                PublishOutcome::TransportFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

impl WebSubHubAdapter {
    /// Submit `payload` to the hub and return without waiting for it.
    ///
    /// Configuration and payload problems are returned here. Everything
    /// after submission is reported through telemetry and the returned
    /// [`Dispatch`].
    ///
    /// The request runs on the adapter's runtime, so the calling thread
    /// needs no runtime of its own.
    ///
    /// # Errors
    ///
    /// [`ClientError::AdapterDisabled`], [`ClientError::BaseUrlNotConfigured`],
    /// [`ClientError::InvalidPayload`], [`ServerError::InvalidBaseUrl`], or a
    /// client restart failure.
    ///
    /// [`ClientError::AdapterDisabled`]: crate::error::ClientError::AdapterDisabled
    /// [`ClientError::BaseUrlNotConfigured`]: crate::error::ClientError::BaseUrlNotConfigured
    /// [`ClientError::InvalidPayload`]: crate::error::ClientError::InvalidPayload
    /// [`ServerError::InvalidBaseUrl`]: crate::error::ServerError::InvalidBaseUrl
    pub fn dispatch(
        &self,
        payload: &SecurityEventTokenPayload,
        context: &EventContext,
    ) -> std::result::Result<Dispatch, AdapterError> {
        self.ensure_enabled()?;

        let topic = context.topic();
        let url = build_topic_url(&topic, self.base_url()?, HubOperation::Publish)?;
        let request = HubRequest::publish(url, payload, context.correlation_id())?;
        let channel = self.inner.connections.channel()?;

        let task = PublishTask {
            telemetry: self.telemetry(),
            url: request.url().to_string(),
            tenant_domain: context.tenant_domain().to_owned(),
            topic: topic.to_string(),
        };
        task.diagnostic(DiagnosticResult::Success, PUBLISHING_MESSAGE);
        debug!(
            url = %task.url,
            tenant_domain = %task.tenant_domain,
            topic = %task.topic,
            correlation_id = %request.correlation_id(),
            "Publishing event to hub"
        );

        let correlation_id = request.correlation_id().clone();
        let handle = self.inner.connections.spawn(task.run(channel, request));

        Ok(Dispatch {
            correlation_id,
            handle,
        })
    }
}

#[async_trait]
impl EventPublisher for WebSubHubAdapter {
    fn name(&self) -> &'static str {
        "websubhub"
    }

    async fn publish(
        &self,
        payload: &SecurityEventTokenPayload,
        context: &EventContext,
    ) -> Result<()> {
        match self.dispatch(payload, context) {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(
                    tenant_domain = context.tenant_domain(),
                    event_uri = context.event_uri(),
                    code = e.code(),
                    error = %e,
                    "Event not published"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::infrastructure::config::AdapterConfiguration;
    use crate::testkit::domain::sample_payload;
    use crate::testkit::telemetry::RecordingTelemetry;

    #[tokio::test]
    async fn disabled_dispatch_fails_without_telemetry() {
        let telemetry = Arc::new(RecordingTelemetry::new());
        let adapter =
            WebSubHubAdapter::new(AdapterConfiguration::disabled(), telemetry.clone()).unwrap();

        let result = adapter.dispatch(&sample_payload(), &EventContext::new("wso2.com", "e"));
        assert!(matches!(
            result,
            Err(AdapterError::Client(ClientError::AdapterDisabled))
        ));
        assert!(telemetry.diagnostics().is_empty());
        assert!(telemetry.correlations().is_empty());
    }

    #[tokio::test]
    async fn invalid_base_url_fails_before_dispatch() {
        let telemetry = Arc::new(RecordingTelemetry::new());
        let adapter = WebSubHubAdapter::new(
            AdapterConfiguration::enabled("not a url"),
            telemetry.clone(),
        )
        .unwrap();

        let result = adapter.dispatch(&sample_payload(), &EventContext::new("wso2.com", "e"));
        assert!(matches!(
            result,
            Err(AdapterError::Server(
                crate::error::ServerError::InvalidBaseUrl { .. }
            ))
        ));
        assert!(telemetry.diagnostics().is_empty());
    }

    #[tokio::test]
    async fn unreachable_hub_is_a_transport_failure() {
        let telemetry = Arc::new(RecordingTelemetry::new());
        let adapter = WebSubHubAdapter::new(
            AdapterConfiguration::enabled("http://127.0.0.1:1/hub"),
            telemetry.clone(),
        )
        .unwrap();

        let dispatch = adapter
            .dispatch(&sample_payload(), &EventContext::new("wso2.com", "e"))
            .unwrap();
        let outcome = dispatch.outcome().await;

        assert!(matches!(outcome, PublishOutcome::TransportFailed { .. }));
        let correlations = telemetry.correlations();
        assert_eq!(correlations.len(), 1);
        assert_eq!(correlations[0].status, RequestStatus::Failed);
        let diagnostics = telemetry.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].result, DiagnosticResult::Failed);
    }
}
