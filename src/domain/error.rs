//! Validation errors for domain values.
//!
//! Returned by the validating constructors in this module tree.
//!
//! ```
//! use websubhub_publisher::domain::error::PayloadError;
//! use websubhub_publisher::domain::payload::SecurityEventTokenPayload;
//!
//! let result = SecurityEventTokenPayload::builder().aud("https://rp.example.com").build();
//! assert!(matches!(result, Err(PayloadError::MissingClaim { claim: "iss" })));
//! ```

use thiserror::Error;

/// Errors raised while assembling a security event token payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// A mandatory claim was not supplied or was empty.
    #[error("missing required claim: {claim}")]
    MissingClaim {
        /// Claim name as it appears on the wire.
        claim: &'static str,
    },

    /// The same event type was added twice.
    #[error("duplicate event type: {event_uri}")]
    DuplicateEvent {
        /// The repeated event type URI.
        event_uri: String,
    },
}
