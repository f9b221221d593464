use std::path::PathBuf;

use anyhow::{Context, Result};
use initctx_config::constants::env;
use initctx_config::{ConfigBuilder, ConfigManager};

pub mod args;
pub mod mock_server;
pub mod repo;
pub mod replay;

pub use args::{Cli, Commands};
pub use mock_server::handle_mock_server_command;
pub use repo::handle_repo_command;
pub use replay::{ReplayOptions, handle_replay_command};

/// Explicit `--config`, then `INITCTX_CONFIG_PATH`, then workspace discovery,
/// with `-c key=value` overrides applied on top.
pub fn load_config(cli: &Cli) -> Result<ConfigManager> {
    let mut builder = ConfigBuilder::new().workspace(workspace_dir(cli)?);

    let explicit = cli.config.clone().or_else(|| {
        std::env::var(env::CONFIG_PATH)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    });
    if let Some(path) = explicit {
        builder = builder.config_file(path);
    }

    builder
        .cli_overrides(&cli.overrides)?
        .build()
        .context("Failed to load initctx configuration")
}

/// `--workspace`, then `INITCTX_WORKSPACE`, then the current directory.
pub fn workspace_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = &cli.workspace {
        return Ok(path.clone());
    }
    match std::env::var(env::WORKSPACE) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => std::env::current_dir().context("Failed to resolve current directory"),
    }
}
