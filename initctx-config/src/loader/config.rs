use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::context::ContextConfig;
use crate::debug::DebugConfig;
use crate::repository::RepositoryConfig;
use crate::server::ServerConfig;

/// Effective configuration after all layers are merged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct InitCtxConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl InitCtxConfig {
    pub fn validate(&self) -> Result<()> {
        self.server
            .validate()
            .context("Invalid [server] configuration")?;
        self.repository
            .validate()
            .context("Invalid [repository] configuration")?;
        Ok(())
    }

    /// Parse a single TOML document and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}
