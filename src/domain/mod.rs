//! Hub-agnostic domain values: event context, topics, payloads and subjects.

pub mod correlation;
pub mod error;
pub mod event;
pub mod payload;
pub mod subject;

pub use correlation::CorrelationId;
pub use event::{EventContext, Topic};
pub use payload::{SecurityEventTokenPayload, SetClaims};
pub use subject::Subject;
