//! Operator CLI.
//!
//! Thin handlers over the hub adapter: each command builds the adapter from
//! the loaded settings, runs one operation and prints the result.

pub mod check;
pub mod command;
pub mod output;
pub mod publish;
pub mod topic;

use crate::infrastructure::config::Settings;

use command::Commands;

/// Run one CLI command against `settings`.
pub async fn execute(command: Commands, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Commands::Publish(args) => publish::execute(settings, &args).await,
        Commands::Register(args) => topic::execute_register(settings, &args).await,
        Commands::Deregister(args) => topic::execute_deregister(settings, &args).await,
        Commands::Check => check::execute(settings),
    }
}
