//! Hub response classification.
//!
//! Pure functions over `(status, body)`; the callers own logging and
//! telemetry.

use std::collections::HashMap;

use super::request::HubOperation;
use crate::domain::Topic;
use crate::error::{AdapterError, ClientError, ServerError};
use crate::port::RequestStatus;

/// Body the hub returns for an accepted register or deregister.
pub const SUCCESS_MARKER: &str = "hub.mode=accepted";

/// Form key carrying the hub's rejection reason.
pub const REASON_KEY: &str = "reason";

/// Form key carrying the active-subscriber count on a refused deregister.
pub const ACTIVE_SUBSCRIBERS_KEY: &str = "hub.topic.activesubscribers";

/// Reason text the hub uses when a topic still has subscribers. The hub may
/// append `": <topic>"`.
pub const ACTIVE_SUBSCRIBERS_REASON: &str = "Topic has active subscribers";

/// Status codes that count as a delivered publish.
pub const PUBLISH_SUCCESS_CODES: [u16; 4] = [200, 201, 202, 204];

#[must_use]
pub fn is_publish_success(status: u16) -> bool {
    PUBLISH_SUCCESS_CODES.contains(&status)
}

/// Result of a register or deregister call the hub did not reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicOutcome {
    /// The hub answered with the success marker.
    Completed,
    /// The topic was already in the requested state (409 on register, 404 on
    /// deregister).
    Unchanged { status: u16 },
}

/// How a topic call ended, ready for logging.
#[derive(Debug)]
pub struct TopicVerdict {
    /// Status written to the correlation record.
    pub request_status: RequestStatus,
    pub result: Result<TopicOutcome, AdapterError>,
}

/// Classify a register or deregister response.
#[must_use]
pub fn classify_topic_response(
    status: u16,
    body: &str,
    topic: &Topic,
    operation: HubOperation,
) -> TopicVerdict {
    match (status, operation) {
        (200, _) => TopicVerdict {
            request_status: RequestStatus::Completed,
            result: classify_accepted(body, topic, operation),
        },
        (409, HubOperation::Register) | (404, HubOperation::Deregister) => TopicVerdict {
            request_status: RequestStatus::Failed,
            result: Ok(TopicOutcome::Unchanged { status }),
        },
        (403, _) => TopicVerdict {
            request_status: RequestStatus::Cancelled,
            result: Err(active_subscribers(body, topic)
                .unwrap_or_else(|| backend_error(status, body, topic, operation))),
        },
        _ => TopicVerdict {
            request_status: RequestStatus::Cancelled,
            result: Err(backend_error(status, body, topic, operation)),
        },
    }
}

fn classify_accepted(
    body: &str,
    topic: &Topic,
    operation: HubOperation,
) -> Result<TopicOutcome, AdapterError> {
    if body.is_empty() {
        return Err(ServerError::EmptyHubResponse {
            topic: topic.to_string(),
            operation: operation.to_string(),
        }
        .into());
    }
    if body == SUCCESS_MARKER {
        return Ok(TopicOutcome::Completed);
    }
    Err(ServerError::InvalidHubResponse {
        topic: topic.to_string(),
        operation: operation.to_string(),
        body: body.to_owned(),
    }
    .into())
}

fn active_subscribers(body: &str, topic: &Topic) -> Option<AdapterError> {
    let form = parse_hub_form(body);
    let reason = form.get(REASON_KEY)?;
    if !is_active_subscribers_reason(reason, topic) {
        return None;
    }
    Some(
        ClientError::ActiveSubscribers {
            topic: topic.to_string(),
            count: form.get(ACTIVE_SUBSCRIBERS_KEY).cloned().unwrap_or_default(),
        }
        .into(),
    )
}

fn is_active_subscribers_reason(reason: &str, topic: &Topic) -> bool {
    match reason.strip_prefix(ACTIVE_SUBSCRIBERS_REASON) {
        Some("") => true,
        Some(rest) => rest.strip_prefix(": ") == Some(topic.as_str()),
        None => false,
    }
}

fn backend_error(status: u16, body: &str, topic: &Topic, operation: HubOperation) -> AdapterError {
    ServerError::HubBackendError {
        topic: topic.to_string(),
        operation: operation.to_string(),
        body: body.to_owned(),
        status,
    }
    .into()
}

/// Parse a `key=value&key=value` hub body.
///
/// Parts without exactly one `=` are skipped. Keys and values are
/// percent-decoded. Later duplicates win.
#[must_use]
pub fn parse_hub_form(body: &str) -> HashMap<String, String> {
    body.split('&')
        .filter(|part| part.split('=').count() == 2)
        .filter_map(|part| url::form_urlencoded::parse(part.as_bytes()).next())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic() -> Topic {
        Topic::new("wso2.com", "test/event")
    }

    #[test]
    fn publish_success_codes() {
        for status in [200, 201, 202, 204] {
            assert!(is_publish_success(status));
        }
        for status in [203, 206, 301, 400, 500] {
            assert!(!is_publish_success(status));
        }
    }

    #[test]
    fn marker_is_completed() {
        let verdict =
            classify_topic_response(200, SUCCESS_MARKER, &topic(), HubOperation::Register);
        assert_eq!(verdict.request_status, RequestStatus::Completed);
        assert!(matches!(verdict.result, Ok(TopicOutcome::Completed)));
    }

    #[test]
    fn unexpected_200_body_is_invalid_response() {
        let verdict = classify_topic_response(200, "unexpected", &topic(), HubOperation::Register);
        assert_eq!(verdict.request_status, RequestStatus::Completed);
        match verdict.result {
            Err(AdapterError::Server(ServerError::InvalidHubResponse {
                topic,
                operation,
                body,
            })) => {
                assert_eq!(topic, "wso2.com/test/event");
                assert_eq!(operation, "register");
                assert_eq!(body, "unexpected");
            }
            other => panic!("unexpected verdict: {other:?}"),
        }
    }

    #[test]
    fn empty_200_body_is_empty_response() {
        let verdict = classify_topic_response(200, "", &topic(), HubOperation::Deregister);
        assert!(matches!(
            verdict.result,
            Err(AdapterError::Server(ServerError::EmptyHubResponse { .. }))
        ));
    }

    #[test]
    fn conflict_on_register_is_unchanged() {
        let verdict = classify_topic_response(409, "", &topic(), HubOperation::Register);
        assert_eq!(verdict.request_status, RequestStatus::Failed);
        assert!(matches!(
            verdict.result,
            Ok(TopicOutcome::Unchanged { status: 409 })
        ));
    }

    #[test]
    fn not_found_on_deregister_is_unchanged() {
        let verdict = classify_topic_response(404, "", &topic(), HubOperation::Deregister);
        assert_eq!(verdict.request_status, RequestStatus::Failed);
        assert!(matches!(
            verdict.result,
            Ok(TopicOutcome::Unchanged { status: 404 })
        ));
    }

    #[test]
    fn crossed_statuses_are_backend_errors() {
        for (status, operation) in [(404, HubOperation::Register), (409, HubOperation::Deregister)]
        {
            let verdict = classify_topic_response(status, "nope", &topic(), operation);
            assert_eq!(verdict.request_status, RequestStatus::Cancelled);
            assert!(matches!(
                verdict.result,
                Err(AdapterError::Server(ServerError::HubBackendError { status: s, .. }))
                    if s == status
            ));
        }
    }

    #[test]
    fn forbidden_with_active_subscribers_is_client_error() {
        let body = "reason=Topic%20has%20active%20subscribers&hub.topic.activesubscribers=3";
        let verdict = classify_topic_response(403, body, &topic(), HubOperation::Deregister);
        assert_eq!(verdict.request_status, RequestStatus::Cancelled);
        match verdict.result {
            Err(AdapterError::Client(ClientError::ActiveSubscribers { topic, count })) => {
                assert_eq!(topic, "wso2.com/test/event");
                assert_eq!(count, "3");
            }
            other => panic!("unexpected verdict: {other:?}"),
        }
    }

    #[test]
    fn forbidden_reason_may_name_the_topic() {
        let body = "reason=Topic+has+active+subscribers%3A+wso2.com%2Ftest%2Fevent&hub.topic.activesubscribers=1";
        let verdict = classify_topic_response(403, body, &topic(), HubOperation::Deregister);
        assert!(matches!(
            verdict.result,
            Err(AdapterError::Client(ClientError::ActiveSubscribers { .. }))
        ));
    }

    #[test]
    fn forbidden_for_another_topic_is_backend_error() {
        let body = "reason=Topic%20has%20active%20subscribers%3A%20other%2Ftopic";
        let verdict = classify_topic_response(403, body, &topic(), HubOperation::Deregister);
        assert!(matches!(
            verdict.result,
            Err(AdapterError::Server(ServerError::HubBackendError { status: 403, .. }))
        ));
    }

    #[test]
    fn forbidden_with_other_reason_is_backend_error() {
        let verdict =
            classify_topic_response(403, "reason=forbidden", &topic(), HubOperation::Register);
        match verdict.result {
            Err(AdapterError::Server(ServerError::HubBackendError { body, status, .. })) => {
                assert_eq!(status, 403);
                assert_eq!(body, "reason=forbidden");
            }
            other => panic!("unexpected verdict: {other:?}"),
        }
    }

    #[test]
    fn server_errors_are_backend_errors() {
        let verdict = classify_topic_response(500, "boom", &topic(), HubOperation::Register);
        assert_eq!(verdict.request_status, RequestStatus::Cancelled);
        assert!(matches!(
            verdict.result,
            Err(AdapterError::Server(ServerError::HubBackendError { status: 500, .. }))
        ));
    }

    #[test]
    fn form_parsing_skips_malformed_parts() {
        let form = parse_hub_form("a=1&broken&b=x=y&c=%2Fpath&&d=");
        assert_eq!(form.get("a").map(String::as_str), Some("1"));
        assert_eq!(form.get("c").map(String::as_str), Some("/path"));
        assert_eq!(form.get("d").map(String::as_str), Some(""));
        assert!(!form.contains_key("broken"));
        assert!(!form.contains_key("b"));
        assert_eq!(form.len(), 3);
    }

    #[test]
    fn empty_body_parses_to_nothing() {
        assert!(parse_hub_form("").is_empty());
    }
}
