use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use initctx_commons::http::create_client_with_timeouts;
use initctx_config::ServerConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{RepositoryResolver, RepositorySource, ResolveError, ResolvedRepository};
use crate::git_info::GitRemote;

/// Backend route answering "which repository is this remote?".
pub const LOOKUP_PATH: &str = "/.api/repos/lookup";

/// Body of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoLookupResponse {
    pub name: String,
    pub remote: String,
}

/// Asks the backend for an enterprise repo mapping. Answers, including
/// "not mapped", are cached per canonical remote for the resolver's lifetime.
pub struct EnterpriseResolver {
    client: Client,
    endpoint: String,
    access_token: Option<String>,
    cache: Mutex<HashMap<String, Option<ResolvedRepository>>>,
}

impl EnterpriseResolver {
    pub fn new(client: Client, endpoint: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            access_token,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_server_config(endpoint: &str, server: &ServerConfig) -> Self {
        let client = create_client_with_timeouts(server.connect_timeout(), server.request_timeout());
        Self::new(client, endpoint, server.access_token())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn lookup_url(&self, remote: &GitRemote) -> Result<Url, ResolveError> {
        let mut url = Url::parse(&format!("{}{}", self.endpoint, LOOKUP_PATH))?;
        url.query_pairs_mut()
            .append_pair("remote", &remote.canonical_name());
        Ok(url)
    }

    fn cached(&self, key: &str) -> Option<Option<ResolvedRepository>> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    fn remember(&self, key: String, value: Option<ResolvedRepository>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, value);
        }
    }
}

#[async_trait]
impl RepositoryResolver for EnterpriseResolver {
    fn name(&self) -> &'static str {
        "enterprise"
    }

    async fn resolve(&self, remote: &GitRemote) -> Result<Option<ResolvedRepository>, ResolveError> {
        let key = remote.canonical_name();
        if let Some(cached) = self.cached(&key) {
            debug!(remote = %key, hit = cached.is_some(), "enterprise lookup served from cache");
            return Ok(cached);
        }

        let url = self.lookup_url(remote)?;
        let mut request = self.client.get(url);
        if let Some(token) = &self.access_token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {token}"));
        }

        let response = request.send().await?;
        let resolved = match response.status() {
            StatusCode::OK => {
                let body: RepoLookupResponse = response.json().await?;
                Some(ResolvedRepository {
                    name: body.name,
                    remote_url: remote.url.clone(),
                    source: RepositorySource::Enterprise,
                })
            }
            StatusCode::NOT_FOUND => None,
            status => {
                return Err(ResolveError::UnexpectedStatus {
                    status: status.as_u16(),
                });
            }
        };

        debug!(remote = %key, resolved = ?resolved.as_ref().map(|r| &r.name), "enterprise lookup finished");
        self.remember(key, resolved.clone());
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git_info::parse_remote_url;

    #[test]
    fn lookup_url_encodes_canonical_remote() {
        let resolver = EnterpriseResolver::new(Client::new(), "http://127.0.0.1:4000/", None);
        let remote = parse_remote_url("git@codehost.example:user/my repo.git").unwrap();
        let url = resolver.lookup_url(&remote).unwrap();
        assert_eq!(url.path(), LOOKUP_PATH);
        assert_eq!(
            url.query(),
            Some("remote=codehost.example%2Fuser%2Fmy+repo")
        );
        assert_eq!(resolver.endpoint(), "http://127.0.0.1:4000");
    }

    #[tokio::test]
    async fn cached_answers_skip_the_network() {
        // Port 9 (discard) is never contacted because the cache answers first.
        let resolver = EnterpriseResolver::new(Client::new(), "http://127.0.0.1:9", None);
        let remote = parse_remote_url("https://codehost.example/user/myrepo").unwrap();
        resolver.remember(remote.canonical_name(), None);

        assert!(resolver.resolve(&remote).await.unwrap().is_none());
    }
}
