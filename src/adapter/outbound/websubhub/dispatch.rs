//! Request execution and correlation bookkeeping.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::connection::HubChannel;
use super::request::HubRequest;
use crate::domain::CorrelationId;
use crate::error::ServerError;
use crate::port::{CorrelationRecord, RequestStatus, Telemetry};

const METHOD: &str = "POST";

/// What came back from the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubReply {
    pub status: u16,
    /// Canonical reason phrase for `status`, when one exists. The phrase on
    /// the hub's status line is not kept.
    pub phrase: Option<String>,
    pub body: String,
}

/// Send `request` over `channel`, holding a pool slot until the body is read.
///
/// # Errors
///
/// [`ServerError::ConnectionUnavailable`] when no pool slot frees up in time,
/// [`ServerError::Transport`] for connect, read and protocol failures.
pub async fn execute(channel: &HubChannel, request: HubRequest) -> Result<HubReply, ServerError> {
    let _permit = channel.checkout(request.url()).await?;

    let response = request
        .into_builder(channel.client())
        .send()
        .await
        .map_err(ServerError::Transport)?;

    let status = response.status();
    let body = response.text().await.map_err(ServerError::Transport)?;
    debug!(status = status.as_u16(), bytes = body.len(), "Hub responded");

    Ok(HubReply {
        status: status.as_u16(),
        phrase: status.canonical_reason().map(str::to_owned),
        body,
    })
}

/// Emits exactly one correlation record per hub request.
///
/// Closed explicitly with the request's outcome. If the owning task is
/// dropped first (runtime shutdown, aborted handle) a `cancelled` record is
/// emitted on drop instead.
pub(crate) struct CorrelationScope {
    telemetry: Arc<dyn Telemetry>,
    correlation_id: CorrelationId,
    url: String,
    started: Instant,
    closed: bool,
}

impl CorrelationScope {
    pub(crate) fn open(telemetry: Arc<dyn Telemetry>, request: &HubRequest) -> Self {
        Self {
            telemetry,
            correlation_id: request.correlation_id().clone(),
            url: request.url().to_string(),
            started: Instant::now(),
            closed: false,
        }
    }

    /// Close with a response from the hub.
    pub(crate) fn responded(mut self, status: RequestStatus, reply: &HubReply) {
        self.emit(status, Some(reply.status), reply.phrase.clone(), None);
    }

    /// Close with a failure that produced no response.
    pub(crate) fn failed(mut self, error: &ServerError) {
        self.emit(RequestStatus::Failed, None, None, Some(error.to_string()));
    }

    fn emit(
        &mut self,
        status: RequestStatus,
        response_code: Option<u16>,
        response_phrase: Option<String>,
        detail: Option<String>,
    ) {
        self.closed = true;
        self.telemetry.correlation(CorrelationRecord {
            correlation_id: self.correlation_id.clone(),
            method: METHOD,
            url: self.url.clone(),
            status,
            response_code,
            response_phrase,
            detail,
            elapsed: self.started.elapsed(),
        });
    }
}

impl Drop for CorrelationScope {
    fn drop(&mut self) {
        if !self.closed {
            self.emit(
                RequestStatus::Cancelled,
                None,
                None,
                Some(ServerError::Cancelled.to_string()),
            );
        }
    }
}
