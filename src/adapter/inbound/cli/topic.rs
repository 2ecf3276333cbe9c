//! `websubhub register` and `websubhub deregister`.

use super::command::TopicArgs;
use super::output;
use crate::adapter::outbound::websubhub::{HubOperation, TopicOutcome, WebSubHubAdapter};
use crate::domain::Topic;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Settings;

pub async fn execute_register(settings: &Settings, args: &TopicArgs) -> anyhow::Result<()> {
    let adapter = bootstrap::build_websubhub_adapter(settings, None)?;
    run(&adapter, args, HubOperation::Register).await
}

pub async fn execute_deregister(settings: &Settings, args: &TopicArgs) -> anyhow::Result<()> {
    let adapter = bootstrap::build_websubhub_adapter(settings, None)?;
    run(&adapter, args, HubOperation::Deregister).await
}

async fn run(
    adapter: &WebSubHubAdapter,
    args: &TopicArgs,
    operation: HubOperation,
) -> anyhow::Result<()> {
    output::section(match operation {
        HubOperation::Register => "Register topic",
        _ => "Deregister topic",
    });
    output::field("Topic", Topic::new(&args.tenant, &args.event_uri));

    let result = adapter
        .manage_topic(&args.event_uri, &args.tenant, operation, None)
        .await;
    match result {
        Ok(TopicOutcome::Completed) => {
            output::success("Hub accepted the request");
            Ok(())
        }
        Ok(TopicOutcome::Unchanged { status }) => {
            output::field("Status", status);
            output::warning("Topic was already in the requested state");
            Ok(())
        }
        Err(e) => {
            output::field("Code", e.code());
            output::error(e.message());
            Err(e.into())
        }
    }
}
