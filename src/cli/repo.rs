use std::path::Path;

use anyhow::{Result, anyhow};
use initctx_config::InitCtxConfig;
use initctx_core::git_info::parse_remote_url;
use initctx_core::{ResolvedRepository, detect_repository, resolver_from_config};

pub async fn handle_repo_command(
    config: &InitCtxConfig,
    workspace: &Path,
    remote: Option<&str>,
    json: bool,
) -> Result<()> {
    let resolver = resolver_from_config(config);
    let repository = match remote {
        Some(raw) => {
            let remote = parse_remote_url(raw)
                .ok_or_else(|| anyhow!("'{raw}' is not a remote URL with a host"))?;
            resolver.resolve_or_none(&remote).await
        }
        None => {
            detect_repository(workspace, &config.repository.preferred_remote, &resolver).await?
        }
    };

    if let Some(repository) = repository {
        print_repository(&repository, json)?;
    } else {
        tracing::info!(workspace = %workspace.display(), "no resolvable repository");
    }
    Ok(())
}

fn print_repository(repository: &ResolvedRepository, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(repository)?);
    } else {
        println!("{}", repository.short_name());
    }
    Ok(())
}
