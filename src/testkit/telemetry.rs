//! Recording telemetry sink.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::port::{CorrelationRecord, DiagnosticRecord, Telemetry};

/// Thread-safe collector of telemetry records.
#[derive(Default)]
pub struct RecordingTelemetry {
    diagnostics: Mutex<Vec<DiagnosticRecord>>,
    correlations: Mutex<Vec<CorrelationRecord>>,
    changed: Notify,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<DiagnosticRecord> {
        self.diagnostics.lock().clone()
    }

    pub fn correlations(&self) -> Vec<CorrelationRecord> {
        self.correlations.lock().clone()
    }

    /// Wait until at least `count` correlation records arrived.
    ///
    /// Panics after `timeout`.
    pub async fn wait_for_correlations(&self, count: usize, timeout: Duration) {
        self.wait_until(timeout, || self.correlations.lock().len() >= count)
            .await;
    }

    /// Wait until at least `count` diagnostic records arrived.
    ///
    /// Panics after `timeout`.
    pub async fn wait_for_diagnostics(&self, count: usize, timeout: Duration) {
        self.wait_until(timeout, || self.diagnostics.lock().len() >= count)
            .await;
    }

    async fn wait_until(&self, timeout: Duration, done: impl Fn() -> bool) {
        let wait = async {
            loop {
                let notified = self.changed.notified();
                if done() {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, wait)
            .await
            .expect("telemetry records did not arrive in time");
    }
}

impl Telemetry for RecordingTelemetry {
    fn diagnostic(&self, record: DiagnosticRecord) {
        self.diagnostics.lock().push(record);
        self.changed.notify_waiters();
    }

    fn correlation(&self, record: CorrelationRecord) {
        self.correlations.lock().push(record);
        self.changed.notify_waiters();
    }
}
