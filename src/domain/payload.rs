//! Security Event Token payloads.
//!
//! A payload is either a plain SET claim set or a CAEP payload, which adds a
//! `sub_id` subject identifier. Both serialize to a single JSON object with
//! absent and empty values left out.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::PayloadError;
use super::subject::Subject;

/// Claims shared by every security event token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetClaims {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    iss: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    jti: String,
    /// Issued-at, epoch milliseconds.
    iat: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    txn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rci: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    events: BTreeMap<String, Value>,
}

impl SetClaims {
    #[must_use]
    pub fn iss(&self) -> &str {
        &self.iss
    }

    #[must_use]
    pub fn jti(&self) -> &str {
        &self.jti
    }

    #[must_use]
    pub fn iat(&self) -> i64 {
        self.iat
    }

    #[must_use]
    pub fn aud(&self) -> &str {
        &self.aud
    }

    #[must_use]
    pub fn txn(&self) -> Option<&str> {
        self.txn.as_deref()
    }

    #[must_use]
    pub fn rci(&self) -> Option<&str> {
        self.rci.as_deref()
    }

    /// Event type URI to event claims.
    #[must_use]
    pub fn events(&self) -> &BTreeMap<String, Value> {
        &self.events
    }
}

/// CAEP payload: the common claims plus the subject the event is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaepPayload {
    #[serde(flatten)]
    claims: SetClaims,
    sub_id: Subject,
}

impl CaepPayload {
    #[must_use]
    pub fn claims(&self) -> &SetClaims {
        &self.claims
    }

    #[must_use]
    pub fn sub_id(&self) -> &Subject {
        &self.sub_id
    }
}

/// Event body sent to the hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SecurityEventTokenPayload {
    Base(SetClaims),
    Caep(CaepPayload),
}

impl SecurityEventTokenPayload {
    #[must_use]
    pub fn builder() -> PayloadBuilder {
        PayloadBuilder::default()
    }

    #[must_use]
    pub fn claims(&self) -> &SetClaims {
        match self {
            Self::Base(claims) => claims,
            Self::Caep(caep) => &caep.claims,
        }
    }

    #[must_use]
    pub fn subject(&self) -> Option<&Subject> {
        match self {
            Self::Base(_) => None,
            Self::Caep(caep) => Some(&caep.sub_id),
        }
    }
}

/// Validating builder for [`SecurityEventTokenPayload`].
///
/// `iss` and `aud` are mandatory. `jti` defaults to a random UUID and `iat`
/// to the current time.
#[derive(Debug, Default)]
pub struct PayloadBuilder {
    iss: Option<String>,
    jti: Option<String>,
    iat: Option<i64>,
    aud: Option<String>,
    txn: Option<String>,
    rci: Option<String>,
    events: Vec<(String, Value)>,
}

impl PayloadBuilder {
    #[must_use]
    pub fn iss(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    #[must_use]
    pub fn jti(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Issued-at in epoch milliseconds.
    #[must_use]
    pub fn iat(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    #[must_use]
    pub fn aud(mut self, aud: impl Into<String>) -> Self {
        self.aud = Some(aud.into());
        self
    }

    #[must_use]
    pub fn txn(mut self, txn: impl Into<String>) -> Self {
        self.txn = Some(txn.into());
        self
    }

    #[must_use]
    pub fn rci(mut self, rci: impl Into<String>) -> Self {
        self.rci = Some(rci.into());
        self
    }

    /// Add the claims for one event type. Null members of an object are dropped.
    #[must_use]
    pub fn event(mut self, event_uri: impl Into<String>, claims: Value) -> Self {
        self.events.push((event_uri.into(), without_nulls(claims)));
        self
    }

    /// Build a plain SET payload.
    pub fn build(self) -> Result<SecurityEventTokenPayload, PayloadError> {
        Ok(SecurityEventTokenPayload::Base(self.into_claims()?))
    }

    /// Build a CAEP payload about `subject`.
    pub fn build_caep(self, subject: Subject) -> Result<SecurityEventTokenPayload, PayloadError> {
        Ok(SecurityEventTokenPayload::Caep(CaepPayload {
            claims: self.into_claims()?,
            sub_id: subject,
        }))
    }

    fn into_claims(self) -> Result<SetClaims, PayloadError> {
        let iss = required(self.iss, "iss")?;
        let aud = required(self.aud, "aud")?;

        let mut events = BTreeMap::new();
        for (event_uri, claims) in self.events {
            if events.contains_key(&event_uri) {
                return Err(PayloadError::DuplicateEvent { event_uri });
            }
            events.insert(event_uri, claims);
        }

        Ok(SetClaims {
            iss,
            jti: self
                .jti
                .filter(|jti| !jti.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            iat: self.iat.unwrap_or_else(|| Utc::now().timestamp_millis()),
            aud,
            txn: self.txn.filter(|txn| !txn.is_empty()),
            rci: self.rci.filter(|rci| !rci.is_empty()),
            events,
        })
    }
}

fn required(value: Option<String>, claim: &'static str) -> Result<String, PayloadError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(PayloadError::MissingClaim { claim })
}

fn without_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, without_nulls(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SESSION_REVOKED: &str =
        "https://schemas.openid.net/secevent/caep/event-type/session-revoked";

    fn base() -> PayloadBuilder {
        SecurityEventTokenPayload::builder()
            .iss("https://idp.example.com")
            .jti("jti-token")
            .iat(1_700_000_000_000)
            .aud("https://rp.example.com")
    }

    #[test]
    fn decoded_body_reproduces_claims() {
        let payload = base().build().unwrap();
        let body = serde_json::to_string(&payload).unwrap();
        let decoded: SetClaims = serde_json::from_str(&body).unwrap();

        assert_eq!(decoded.iss(), "https://idp.example.com");
        assert_eq!(decoded.jti(), "jti-token");
        assert_eq!(decoded.aud(), "https://rp.example.com");
        assert_eq!(decoded.iat(), 1_700_000_000_000);
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let payload = base().build().unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("txn"));
        assert!(!object.contains_key("rci"));
        assert!(!object.contains_key("events"));
        assert!(!object.contains_key("sub_id"));
        assert!(!body_contains_null(&value));
    }

    #[test]
    fn missing_issuer_is_rejected() {
        let result = SecurityEventTokenPayload::builder()
            .aud("https://rp.example.com")
            .build();
        assert_eq!(result, Err(PayloadError::MissingClaim { claim: "iss" }));
    }

    #[test]
    fn empty_audience_is_rejected() {
        let result = SecurityEventTokenPayload::builder()
            .iss("https://idp.example.com")
            .aud("")
            .build();
        assert_eq!(result, Err(PayloadError::MissingClaim { claim: "aud" }));
    }

    #[test]
    fn jti_and_iat_default_when_unset() {
        let payload = SecurityEventTokenPayload::builder()
            .iss("iss")
            .aud("aud")
            .build()
            .unwrap();
        assert!(Uuid::parse_str(payload.claims().jti()).is_ok());
        assert!(payload.claims().iat() > 0);
    }

    #[test]
    fn duplicate_event_type_is_rejected() {
        let result = base()
            .event(SESSION_REVOKED, json!({"event_timestamp": 1}))
            .event(SESSION_REVOKED, json!({"event_timestamp": 2}))
            .build();
        assert_eq!(
            result,
            Err(PayloadError::DuplicateEvent {
                event_uri: SESSION_REVOKED.to_string()
            })
        );
    }

    #[test]
    fn event_claims_drop_null_members() {
        let payload = base()
            .event(
                SESSION_REVOKED,
                json!({"event_timestamp": 1_700_000_000, "reason_admin": null}),
            )
            .build()
            .unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value["events"][SESSION_REVOKED],
            json!({"event_timestamp": 1_700_000_000})
        );
    }

    #[test]
    fn caep_payload_flattens_claims_and_adds_subject() {
        let subject = Subject::email("alice@example.com").unwrap();
        let payload = base().txn("txn-1").build_caep(subject.clone()).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["iss"], "https://idp.example.com");
        assert_eq!(value["txn"], "txn-1");
        assert_eq!(value["sub_id"]["format"], "email");
        assert_eq!(value["sub_id"]["email"], "alice@example.com");
        assert_eq!(payload.subject(), Some(&subject));
    }

    fn body_contains_null(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::Object(map) => map.values().any(body_contains_null),
            Value::Array(items) => items.iter().any(body_contains_null),
            _ => false,
        }
    }
}
