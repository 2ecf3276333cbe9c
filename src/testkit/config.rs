//! Canonical adapter configurations for tests.

use std::time::Duration;

use crate::infrastructure::config::AdapterConfiguration;

/// Enabled adapter pointing at `base_url` with generous timeouts.
///
/// Test hubs run on a loaded CI machine; the 300 ms defaults are too tight.
pub fn hub_config(base_url: &str) -> AdapterConfiguration {
    AdapterConfiguration::enabled(base_url).with_timeouts(
        Duration::from_secs(2),
        Duration::from_secs(5),
        Duration::from_secs(2),
    )
}

/// Hub endpoint path used by the integration tests.
pub const HUB_PATH: &str = "/hub";
