//! Mock WebSub hub backed by wiremock.

use std::sync::Arc;
use std::time::Duration;

use websubhub_publisher::adapter::outbound::websubhub::WebSubHubAdapter;
use websubhub_publisher::infrastructure::config::AdapterConfiguration;
use websubhub_publisher::testkit::config::{hub_config, HUB_PATH};
use websubhub_publisher::testkit::telemetry::RecordingTelemetry;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const WAIT: Duration = Duration::from_secs(5);

/// A running mock hub plus an adapter pointed at it.
pub struct TestHub {
    pub server: MockServer,
    pub telemetry: Arc<RecordingTelemetry>,
    pub adapter: WebSubHubAdapter,
}

impl TestHub {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let config = hub_config(&format!("{}{HUB_PATH}", server.uri()));
        Self::with_config(server, config)
    }

    pub fn with_config(server: MockServer, config: AdapterConfiguration) -> Self {
        let telemetry = Arc::new(RecordingTelemetry::new());
        let adapter = WebSubHubAdapter::new(config, telemetry.clone()).expect("adapter starts");
        Self {
            server,
            telemetry,
            adapter,
        }
    }

    /// Answer every `hub.mode=<mode>` call with `response`.
    pub async fn respond(&self, mode: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(HUB_PATH))
            .and(query_param("hub.mode", mode))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    pub async fn requests(&self) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .expect("request recording is enabled")
    }
}
