use async_trait::async_trait;
use tracing::warn;

use super::{RepositoryResolver, ResolveError, ResolvedRepository};
use crate::git_info::GitRemote;

/// Tries resolvers in order; the first one that knows the remote wins.
#[derive(Default)]
pub struct ChainResolver {
    resolvers: Vec<Box<dyn RepositoryResolver>>,
}

impl ChainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resolver: impl RepositoryResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|resolver| resolver.name()).collect()
    }

    /// Like [`RepositoryResolver::resolve`], but a failing resolver is logged
    /// and skipped so an unreachable backend only hides the mention.
    pub async fn resolve_or_none(&self, remote: &GitRemote) -> Option<ResolvedRepository> {
        for resolver in &self.resolvers {
            match resolver.resolve(remote).await {
                Ok(Some(repository)) => return Some(repository),
                Ok(None) => continue,
                Err(error) => {
                    warn!(
                        resolver = resolver.name(),
                        remote = %remote.url,
                        %error,
                        "repository resolution failed"
                    );
                }
            }
        }
        None
    }
}

#[async_trait]
impl RepositoryResolver for ChainResolver {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn resolve(&self, remote: &GitRemote) -> Result<Option<ResolvedRepository>, ResolveError> {
        Ok(self.resolve_or_none(remote).await)
    }
}
