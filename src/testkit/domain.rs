//! Sample domain values used across tests.

use serde_json::json;

use crate::domain::{EventContext, SecurityEventTokenPayload, Subject};

/// Tenant used by the sample contexts.
pub const TENANT: &str = "wso2.com";

/// CAEP session-revoked event type.
pub const SESSION_REVOKED: &str =
    "https://schemas.openid.net/secevent/caep/event-type/session-revoked";

/// A plain SET payload with fixed `jti` and `iat`.
pub fn sample_payload() -> SecurityEventTokenPayload {
    SecurityEventTokenPayload::builder()
        .iss("https://localhost:9443/oauth2/token")
        .jti("a1b2c3")
        .iat(1_700_000_000_000)
        .aud("https://rp.example.com")
        .event(SESSION_REVOKED, json!({"initiating_entity": "policy"}))
        .build()
        .expect("sample payload is valid")
}

/// A CAEP payload about `user@wso2.com`.
pub fn sample_caep_payload() -> SecurityEventTokenPayload {
    SecurityEventTokenPayload::builder()
        .iss("https://localhost:9443/oauth2/token")
        .jti("d4e5f6")
        .iat(1_700_000_000_000)
        .aud("https://rp.example.com")
        .txn("txn-1")
        .event(SESSION_REVOKED, json!({"initiating_entity": "admin"}))
        .build_caep(Subject::email("user@wso2.com").expect("non-empty email"))
        .expect("sample CAEP payload is valid")
}

/// Context for `event_uri` under [`TENANT`].
pub fn context(event_uri: &str) -> EventContext {
    EventContext::new(TENANT, event_uri)
}
