//! Application services (use cases).
//!
//! These services coordinate adapters to implement the application's use
//! cases.

pub mod publisher;

pub use publisher::EventPublisherService;
