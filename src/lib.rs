//! websubhub-publisher - Security event delivery to a WebSub hub.
//!
//! This crate publishes Security Event Tokens (SETs) to a WebSub-style hub
//! and manages the hub topics they are published to. A topic is the tenant
//! domain joined to the event type URI (`wso2.com/<event-uri>`).
//!
//! # Architecture
//!
//! - **`domain`** - Hub-agnostic values: event context, topics, SET and CAEP
//!   payloads, subject identifiers
//! - **`port`** - The `EventPublisher` entry point and the `Telemetry` sink
//! - **`adapter::outbound::websubhub`** - The hub adapter: pooled client,
//!   request construction, response classification
//! - **`application`** - `EventPublisherService`, fanning events out to
//!   every registered publisher
//! - **`infrastructure`** - Settings, logging and the composition root
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use websubhub_publisher::adapter::outbound::telemetry::TracingTelemetry;
//! use websubhub_publisher::adapter::outbound::websubhub::WebSubHubAdapter;
//! use websubhub_publisher::domain::{EventContext, SecurityEventTokenPayload};
//! use websubhub_publisher::infrastructure::config::AdapterConfiguration;
//! use websubhub_publisher::port::EventPublisher;
//!
//! # async fn run() -> websubhub_publisher::error::Result<()> {
//! let adapter = WebSubHubAdapter::new(
//!     AdapterConfiguration::enabled("https://hub.example.com/hub"),
//!     Arc::new(TracingTelemetry::new()),
//! )?;
//!
//! let payload = SecurityEventTokenPayload::builder()
//!     .iss("https://idp.example.com")
//!     .aud("https://rp.example.com")
//!     .event("urn:example:event", json!({"reason": "test"}))
//!     .build()
//!     .expect("valid payload");
//!
//! adapter
//!     .publish(&payload, &EventContext::new("wso2.com", "urn:example:event"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
