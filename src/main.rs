//! initctx - chat initial context
//!
//! Thin binary entry point that delegates to the CLI handlers.

use anyhow::Result;
use clap::Parser;

mod cli;
mod main_helpers;

use cli::{Cli, Commands};
use main_helpers::{initialize_tracing, initialize_tracing_from_config};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // RUST_LOG takes precedence over the [debug] section
    let env_tracing = initialize_tracing()?;

    let manager = cli::load_config(&args)?;
    let config = manager.config();
    if !env_tracing {
        initialize_tracing_from_config(config)?;
    }
    if let Some(path) = manager.config_path() {
        tracing::debug!(config = %path.display(), "configuration loaded");
    }

    let workspace = cli::workspace_dir(&args)?;

    match &args.command {
        Commands::Repo { remote, json } => {
            cli::handle_repo_command(config, &workspace, remote.as_deref(), *json).await
        }
        Commands::Replay {
            script,
            remote,
            json,
            events,
        } => {
            let options = cli::ReplayOptions {
                remote: remote.as_deref(),
                json: *json,
                events: *events,
            };
            cli::handle_replay_command(config, &workspace, script, options).await
        }
        Commands::MockServer { port, mappings } => {
            cli::handle_mock_server_command(*port, mappings).await
        }
    }
}
