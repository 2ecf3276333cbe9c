mod support;

use support::hub::TestHub;
use websubhub_publisher::adapter::outbound::websubhub::response::SUCCESS_MARKER;
use websubhub_publisher::adapter::outbound::websubhub::TopicOutcome;
use websubhub_publisher::error::{AdapterError, ClientError, ServerError};
use websubhub_publisher::port::RequestStatus;
use websubhub_publisher::testkit::domain::{SESSION_REVOKED, TENANT};
use wiremock::ResponseTemplate;

#[tokio::test]
async fn register_with_marker_completes() {
    let hub = TestHub::start().await;
    hub.respond(
        "register",
        ResponseTemplate::new(200).set_body_string(SUCCESS_MARKER),
    )
    .await;

    let outcome = hub.adapter.register_topic(SESSION_REVOKED, TENANT).await;
    assert!(matches!(outcome, Ok(TopicOutcome::Completed)));

    let requests = hub.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
    assert_eq!(
        requests[0]
            .url
            .query_pairs()
            .find(|(k, _)| k == "hub.topic")
            .map(|(_, v)| v.into_owned()),
        Some(format!("{TENANT}/{SESSION_REVOKED}"))
    );

    let correlations = hub.telemetry.correlations();
    assert_eq!(correlations.len(), 1);
    assert_eq!(correlations[0].status, RequestStatus::Completed);
    assert_eq!(correlations[0].response_code, Some(200));
    assert_eq!(correlations[0].response_phrase.as_deref(), Some("OK"));
}

#[tokio::test]
async fn repeated_register_is_idempotent() {
    let hub = TestHub::start().await;
    hub.respond(
        "register",
        ResponseTemplate::new(200).set_body_string(SUCCESS_MARKER),
    )
    .await;

    for _ in 0..2 {
        let outcome = hub.adapter.register_topic(SESSION_REVOKED, TENANT).await;
        assert!(matches!(outcome, Ok(TopicOutcome::Completed)));
    }
    assert_eq!(hub.requests().await.len(), 2);
}

#[tokio::test]
async fn register_conflict_is_not_an_error() {
    let hub = TestHub::start().await;
    hub.respond(
        "register",
        ResponseTemplate::new(409).set_body_string("topic exists"),
    )
    .await;

    let outcome = hub.adapter.register_topic(SESSION_REVOKED, TENANT).await;
    assert!(matches!(
        outcome,
        Ok(TopicOutcome::Unchanged { status: 409 })
    ));

    let correlations = hub.telemetry.correlations();
    assert_eq!(correlations.len(), 1);
    assert_eq!(correlations[0].status, RequestStatus::Failed);
    assert_eq!(correlations[0].response_code, Some(409));
}

#[tokio::test]
async fn deregister_unknown_topic_is_not_an_error() {
    let hub = TestHub::start().await;
    hub.respond("deregister", ResponseTemplate::new(404)).await;

    let outcome = hub.adapter.deregister_topic(SESSION_REVOKED, TENANT).await;
    assert!(matches!(
        outcome,
        Ok(TopicOutcome::Unchanged { status: 404 })
    ));
    assert_eq!(hub.telemetry.correlations()[0].status, RequestStatus::Failed);
}

#[tokio::test]
async fn deregister_with_active_subscribers_is_a_client_error() {
    let hub = TestHub::start().await;
    hub.respond(
        "deregister",
        ResponseTemplate::new(403).set_body_string(
            "reason=Topic%20has%20active%20subscribers&hub.topic.activesubscribers=3",
        ),
    )
    .await;

    let outcome = hub.adapter.deregister_topic(SESSION_REVOKED, TENANT).await;
    match outcome {
        Err(AdapterError::Client(ClientError::ActiveSubscribers { topic, count })) => {
            assert_eq!(topic, format!("{TENANT}/{SESSION_REVOKED}"));
            assert_eq!(count, "3");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        hub.telemetry.correlations()[0].status,
        RequestStatus::Cancelled
    );
}

#[tokio::test]
async fn unexpected_success_body_is_a_server_error() {
    let hub = TestHub::start().await;
    hub.respond(
        "register",
        ResponseTemplate::new(200).set_body_string("unexpected"),
    )
    .await;

    let err = hub
        .adapter
        .register_topic(SESSION_REVOKED, TENANT)
        .await
        .unwrap_err();

    assert!(!err.is_client());
    let text = err.to_string();
    assert!(text.contains(&format!("{TENANT}/{SESSION_REVOKED}")));
    assert!(text.contains("register"));
    assert!(text.contains("unexpected"));
    assert!(matches!(
        err,
        AdapterError::Server(ServerError::InvalidHubResponse { .. })
    ));
}

#[tokio::test]
async fn empty_success_body_is_a_server_error() {
    let hub = TestHub::start().await;
    hub.respond("deregister", ResponseTemplate::new(200)).await;

    let err = hub
        .adapter
        .deregister_topic(SESSION_REVOKED, TENANT)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdapterError::Server(ServerError::EmptyHubResponse { .. })
    ));
}

#[tokio::test]
async fn backend_failure_is_a_server_error() {
    let hub = TestHub::start().await;
    hub.respond(
        "register",
        ResponseTemplate::new(503).set_body_string("maintenance"),
    )
    .await;

    let err = hub
        .adapter
        .register_topic(SESSION_REVOKED, TENANT)
        .await
        .unwrap_err();
    match err {
        AdapterError::Server(ServerError::HubBackendError { status, body, .. }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let correlations = hub.telemetry.correlations();
    assert_eq!(correlations[0].status, RequestStatus::Cancelled);
    assert_eq!(
        correlations[0].response_phrase.as_deref(),
        Some("Service Unavailable")
    );
}

#[tokio::test]
async fn nonstandard_status_has_no_reason_phrase() {
    let hub = TestHub::start().await;
    hub.respond("deregister", ResponseTemplate::new(599)).await;

    let err = hub
        .adapter
        .deregister_topic(SESSION_REVOKED, TENANT)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdapterError::Server(ServerError::HubBackendError { status: 599, .. })
    ));

    let correlations = hub.telemetry.correlations();
    assert_eq!(correlations[0].response_code, Some(599));
    assert!(correlations[0].response_phrase.is_none());
}

#[tokio::test]
async fn redirects_are_not_followed() {
    let hub = TestHub::start().await;
    hub.respond(
        "register",
        ResponseTemplate::new(302).insert_header("location", "https://elsewhere.example.com/"),
    )
    .await;

    let err = hub
        .adapter
        .register_topic(SESSION_REVOKED, TENANT)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdapterError::Server(ServerError::HubBackendError { status: 302, .. })
    ));
}
