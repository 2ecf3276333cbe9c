mod support;

use std::sync::Arc;

use support::hub::{TestHub, WAIT};
use websubhub_publisher::application::EventPublisherService;
use websubhub_publisher::port::RequestStatus;
use websubhub_publisher::testkit::domain::{context, sample_payload, SESSION_REVOKED};
use wiremock::ResponseTemplate;

#[tokio::test]
async fn service_publishes_through_the_hub_adapter() {
    let hub = TestHub::start().await;
    hub.respond("publish", ResponseTemplate::new(202)).await;

    let mut service = EventPublisherService::new();
    service.register(Arc::new(hub.adapter.clone()));

    service
        .publish(&sample_payload(), &context(SESSION_REVOKED))
        .await
        .unwrap();

    hub.telemetry.wait_for_correlations(1, WAIT).await;
    assert_eq!(
        hub.telemetry.correlations()[0].status,
        RequestStatus::Completed
    );
    assert_eq!(hub.requests().await.len(), 1);
}
