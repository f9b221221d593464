use crate::constants::repository as repository_defaults;
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// How the current repository is detected from git remotes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Remote consulted first; other remotes are used only when it is missing.
    #[serde(default = "default_preferred_remote")]
    pub preferred_remote: String,
    /// Code hosts whose repositories resolve directly from the remote URL.
    #[serde(default = "default_self_serve_hosts")]
    pub self_serve_hosts: Vec<String>,
    /// Ask the configured backend for an enterprise repo mapping.
    #[serde(default = "default_enterprise_lookup")]
    pub enterprise_lookup: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            preferred_remote: default_preferred_remote(),
            self_serve_hosts: default_self_serve_hosts(),
            enterprise_lookup: default_enterprise_lookup(),
        }
    }
}

impl RepositoryConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.preferred_remote.trim().is_empty(),
            "repository.preferred_remote must not be empty"
        );
        ensure!(
            self.self_serve_hosts
                .iter()
                .all(|host| !host.trim().is_empty() && !host.contains('/')),
            "repository.self_serve_hosts entries must be bare host names"
        );
        Ok(())
    }
}

fn default_preferred_remote() -> String {
    repository_defaults::DEFAULT_PREFERRED_REMOTE.to_string()
}

fn default_self_serve_hosts() -> Vec<String> {
    repository_defaults::DEFAULT_SELF_SERVE_HOSTS
        .iter()
        .map(|host| host.to_string())
        .collect()
}

fn default_enterprise_lookup() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_list_public_hosts() {
        let config = RepositoryConfig::default();
        assert_eq!(config.self_serve_hosts, vec!["github.com", "gitlab.com"]);
        assert!(config.enterprise_lookup);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_hosts_with_paths() {
        let config = RepositoryConfig {
            self_serve_hosts: vec!["github.com/org".to_string()],
            ..RepositoryConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
