use crate::constants::{env, server as server_defaults};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Backend used for enterprise repository lookups.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL of the backend. Enterprise lookups are disabled when unset.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Environment variable holding the access token sent with lookups.
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_token_env: default_access_token_env(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            let url = Url::parse(endpoint)
                .with_context(|| format!("server.endpoint is not a valid URL: {endpoint}"))?;
            ensure!(
                matches!(url.scheme(), "http" | "https"),
                "server.endpoint must use http or https, got {}",
                url.scheme()
            );
        }
        ensure!(
            self.connect_timeout_secs > 0,
            "server.connect_timeout_secs must be greater than zero"
        );
        ensure!(
            self.request_timeout_secs >= self.connect_timeout_secs,
            "server.request_timeout_secs must not be shorter than connect_timeout_secs"
        );
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Endpoint without a trailing slash, ready for path concatenation.
    pub fn endpoint_base(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(|endpoint| endpoint.trim_end_matches('/'))
            .filter(|endpoint| !endpoint.is_empty())
    }

    /// Reads the access token from the configured environment variable.
    pub fn access_token(&self) -> Option<String> {
        std::env::var(&self.access_token_env)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

fn default_access_token_env() -> String {
    env::ACCESS_TOKEN.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    server_defaults::DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_request_timeout_secs() -> u64 {
    server_defaults::DEFAULT_REQUEST_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_endpoint() {
        let config = ServerConfig {
            endpoint: Some("ftp://example.com".to_string()),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn endpoint_base_strips_trailing_slash() {
        let config = ServerConfig {
            endpoint: Some("http://127.0.0.1:4000/".to_string()),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint_base(), Some("http://127.0.0.1:4000"));
    }

    #[test]
    fn request_timeout_must_cover_connect_timeout() {
        let config = ServerConfig {
            connect_timeout_secs: 10,
            request_timeout_secs: 2,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
