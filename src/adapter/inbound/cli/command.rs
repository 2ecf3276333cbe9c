//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default settings file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "websubhub.toml";

/// Publish security events to a WebSub hub and manage hub topics
#[derive(Parser, Debug)]
#[command(name = "websubhub")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish a security event token read from a JSON file
    Publish(PublishArgs),
    /// Register the hub topic for an event type
    Register(TopicArgs),
    /// Deregister the hub topic for an event type
    Deregister(TopicArgs),
    /// Print the resolved adapter configuration
    Check,
}

/// Tenant and event type identifying a hub topic.
#[derive(Args, Debug, Clone)]
pub struct TopicArgs {
    /// Tenant domain, e.g. `wso2.com`
    #[arg(long)]
    pub tenant: String,

    /// Event type URI
    #[arg(long)]
    pub event_uri: String,
}

/// Arguments for `websubhub publish`.
#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    #[command(flatten)]
    pub topic: TopicArgs,

    /// JSON file holding the event payload
    #[arg(long)]
    pub payload: PathBuf,

    /// Correlation id to send instead of a generated one
    #[arg(long)]
    pub correlation_id: Option<String>,
}
