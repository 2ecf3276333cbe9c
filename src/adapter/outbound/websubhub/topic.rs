//! Topic registration and deregistration.

use tracing::{debug, error, info, warn};

use super::dispatch::{execute, CorrelationScope};
use super::request::{build_topic_url, HubOperation, HubRequest};
use super::response::{classify_topic_response, TopicOutcome};
use super::WebSubHubAdapter;
use crate::domain::{CorrelationId, Topic};
use crate::error::{AdapterError, ClientError, ServerError};

impl WebSubHubAdapter {
    /// Register the topic for `event_uri` under `tenant_domain`.
    ///
    /// A topic the hub already knows (409) is not an error.
    pub async fn register_topic(
        &self,
        event_uri: &str,
        tenant_domain: &str,
    ) -> Result<TopicOutcome, AdapterError> {
        self.manage_topic(event_uri, tenant_domain, HubOperation::Register, None)
            .await
    }

    /// Deregister the topic for `event_uri` under `tenant_domain`.
    ///
    /// A topic the hub does not know (404) is not an error. A topic that
    /// still has subscribers fails with [`ClientError::ActiveSubscribers`].
    pub async fn deregister_topic(
        &self,
        event_uri: &str,
        tenant_domain: &str,
    ) -> Result<TopicOutcome, AdapterError> {
        self.manage_topic(event_uri, tenant_domain, HubOperation::Deregister, None)
            .await
    }

    /// Register or deregister with an explicit correlation id.
    pub async fn manage_topic(
        &self,
        event_uri: &str,
        tenant_domain: &str,
        operation: HubOperation,
        correlation: Option<&CorrelationId>,
    ) -> Result<TopicOutcome, AdapterError> {
        self.ensure_enabled()?;

        let topic = Topic::new(tenant_domain, event_uri);
        let url = build_topic_url(&topic, self.base_url()?, operation)?;
        let request = HubRequest::topic(url, operation, correlation);
        let channel = self.inner.connections.channel()?;
        let telemetry = self.telemetry();

        debug!(
            topic = %topic,
            operation = %operation,
            correlation_id = %request.correlation_id(),
            "Sending topic request to hub"
        );

        let task = self.inner.connections.spawn(async move {
            let scope = CorrelationScope::open(telemetry, &request);
            match execute(&channel, request).await {
                Ok(reply) => {
                    let verdict =
                        classify_topic_response(reply.status, &reply.body, &topic, operation);
                    scope.responded(verdict.request_status, &reply);
                    log_verdict(&topic, operation, reply.status, &reply.body, &verdict.result);
                    verdict.result
                }
                Err(e) => {
                    scope.failed(&e);
                    error!(
                        topic = %topic,
                        operation = %operation,
                        error = %e,
                        "Topic request to hub failed"
                    );
                    Err(e.into())
                }
            }
        });

        task.await.unwrap_or(Err(ServerError::Cancelled.into()))
    }
}

fn log_verdict(
    topic: &Topic,
    operation: HubOperation,
    status: u16,
    body: &str,
    result: &Result<TopicOutcome, AdapterError>,
) {
    match result {
        Ok(TopicOutcome::Completed) => {
            debug!(topic = %topic, operation = %operation, "Hub accepted topic operation");
        }
        Ok(TopicOutcome::Unchanged { .. }) => {
            warn!(
                topic = %topic,
                operation = %operation,
                status,
                body,
                "Topic already in requested state"
            );
        }
        Err(AdapterError::Client(ClientError::ActiveSubscribers { count, .. })) => {
            info!(
                topic = %topic,
                active_subscribers = %count,
                "Topic deregistration refused, topic has active subscribers"
            );
        }
        Err(e) => {
            error!(
                topic = %topic,
                operation = %operation,
                status,
                code = e.code(),
                error = %e,
                "Hub rejected topic operation"
            );
        }
    }
}
