use async_trait::async_trait;

use super::{RepositoryResolver, RepositorySource, ResolveError, ResolvedRepository};
use crate::git_info::GitRemote;

/// Resolves remotes on public code hosts directly from the URL.
#[derive(Debug, Clone)]
pub struct SelfServeResolver {
    hosts: Vec<String>,
}

impl SelfServeResolver {
    pub fn new(hosts: Vec<String>) -> Self {
        Self { hosts }
    }

    fn knows_host(&self, host: &str) -> bool {
        self.hosts
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(host))
    }
}

#[async_trait]
impl RepositoryResolver for SelfServeResolver {
    fn name(&self) -> &'static str {
        "self-serve"
    }

    async fn resolve(&self, remote: &GitRemote) -> Result<Option<ResolvedRepository>, ResolveError> {
        if !self.knows_host(&remote.host) {
            return Ok(None);
        }
        Ok(Some(ResolvedRepository {
            name: remote.canonical_name(),
            remote_url: remote.url.clone(),
            source: RepositorySource::SelfServe,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git_info::parse_remote_url;

    #[tokio::test]
    async fn resolves_only_listed_hosts() {
        let resolver = SelfServeResolver::new(vec!["CodeHost.example".to_string()]);

        let known = parse_remote_url("git@codehost.example:user/myrepo.git").unwrap();
        let repo = resolver.resolve(&known).await.unwrap().unwrap();
        assert_eq!(repo.name, "codehost.example/user/myrepo");
        assert_eq!(repo.short_name(), "myrepo");

        let unknown = parse_remote_url("https://git.internal.example/team/svc").unwrap();
        assert!(resolver.resolve(&unknown).await.unwrap().is_none());
    }
}
