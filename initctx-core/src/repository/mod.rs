//! Repository resolution.
//!
//! A workspace's git remote becomes a repository mention only when some
//! resolver recognises it: self-serve code hosts resolve straight from the
//! remote URL, other hosts need an enterprise mapping served by the backend.
//! When nothing resolves the remote, the mention is simply left out.

mod chain;
mod enterprise;
mod self_serve;

pub use chain::ChainResolver;
pub use enterprise::{EnterpriseResolver, LOOKUP_PATH, RepoLookupResponse};
pub use self_serve::SelfServeResolver;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use initctx_config::InitCtxConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::git_info::{GitRemote, workspace_remote};
use crate::mention::repository_short_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositorySource {
    SelfServe,
    Enterprise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRepository {
    /// Full repository name, e.g. `codehost.example/user/myrepo`.
    pub name: String,
    pub remote_url: String,
    pub source: RepositorySource,
}

impl ResolvedRepository {
    pub fn short_name(&self) -> &str {
        repository_short_name(&self.name)
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("repository lookup request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("repository lookup returned unexpected status {status}")]
    UnexpectedStatus { status: u16 },
    #[error("invalid lookup endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

#[async_trait]
pub trait RepositoryResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` means this resolver does not know the remote.
    async fn resolve(&self, remote: &GitRemote) -> Result<Option<ResolvedRepository>, ResolveError>;
}

/// Self-serve resolution first, then the enterprise backend when one is
/// configured and lookups are enabled.
pub fn resolver_from_config(config: &InitCtxConfig) -> ChainResolver {
    let mut chain = ChainResolver::new()
        .with(SelfServeResolver::new(config.repository.self_serve_hosts.clone()));

    if config.repository.enterprise_lookup {
        match config.server.endpoint_base() {
            Some(endpoint) => {
                chain = chain.with(EnterpriseResolver::from_server_config(endpoint, &config.server));
            }
            None => debug!("no server endpoint configured; enterprise lookups disabled"),
        }
    }

    chain
}

/// Reads the workspace's preferred remote and resolves it. Outside a git
/// repository, or when no resolver knows the remote, this is `Ok(None)`.
pub async fn detect_repository(
    cwd: &Path,
    preferred_remote: &str,
    resolver: &ChainResolver,
) -> Result<Option<ResolvedRepository>> {
    let Some(remote) = workspace_remote(cwd, preferred_remote)? else {
        debug!(cwd = %cwd.display(), "no usable git remote");
        return Ok(None);
    };
    Ok(resolver.resolve_or_none(&remote).await)
}
