//! `websubhub publish`: send one event and wait for the hub's answer.

use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::command::PublishArgs;
use super::output;
use crate::adapter::outbound::websubhub::PublishOutcome;
use crate::domain::{CorrelationId, EventContext, SecurityEventTokenPayload, Subject};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Settings;

/// Event payload as written in the `--payload` file.
#[derive(Debug, Deserialize)]
pub struct PayloadFile {
    pub iss: String,
    pub aud: String,
    pub jti: Option<String>,
    pub iat: Option<i64>,
    pub txn: Option<String>,
    pub rci: Option<String>,
    #[serde(default)]
    pub events: Map<String, Value>,
    pub sub_id: Option<Subject>,
}

impl PayloadFile {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read payload file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("payload file {} is not a valid event", path.display()))
    }

    pub fn into_payload(self) -> anyhow::Result<SecurityEventTokenPayload> {
        let mut builder = SecurityEventTokenPayload::builder().iss(self.iss).aud(self.aud);
        if let Some(jti) = self.jti {
            builder = builder.jti(jti);
        }
        if let Some(iat) = self.iat {
            builder = builder.iat(iat);
        }
        if let Some(txn) = self.txn {
            builder = builder.txn(txn);
        }
        if let Some(rci) = self.rci {
            builder = builder.rci(rci);
        }
        for (event_uri, claims) in self.events {
            builder = builder.event(event_uri, claims);
        }
        let payload = match self.sub_id {
            Some(subject) => builder.build_caep(subject)?,
            None => builder.build()?,
        };
        Ok(payload)
    }
}

pub async fn execute(settings: &Settings, args: &PublishArgs) -> anyhow::Result<()> {
    let payload = PayloadFile::read(&args.payload)?.into_payload()?;
    let mut context = EventContext::new(&args.topic.tenant, &args.topic.event_uri);
    if let Some(id) = &args.correlation_id {
        context = context.with_correlation_id(CorrelationId::new(id.as_str()));
    }

    let adapter = bootstrap::build_websubhub_adapter(settings, None)?;
    let dispatch = adapter.dispatch(&payload, &context)?;

    output::section("Publish");
    output::field("Topic", context.topic());
    output::field("Correlation id", dispatch.correlation_id());

    match dispatch.outcome().await {
        PublishOutcome::Delivered { status } => {
            output::field("Status", status);
            output::success("Event accepted by hub");
            Ok(())
        }
        PublishOutcome::Rejected { status, body } => {
            output::field("Status", status);
            output::field("Body", body);
            bail!("hub rejected the event")
        }
        PublishOutcome::TransportFailed { reason } => bail!("event not delivered: {reason}"),
        PublishOutcome::Cancelled => bail!("publish was cancelled"),
    }
}
