use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use initctx_commons::WorkspacePaths;
use tracing::debug;

use crate::constants::env;
use crate::defaults::ConfigDefaults;
use crate::loader::config::InitCtxConfig;
use crate::loader::layers::{ConfigLayerEntry, ConfigLayerSource, ConfigLayerStack};

/// Configuration manager for loading and validating configurations
#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub(crate) config: InitCtxConfig,
    config_path: Option<PathBuf>,
    workspace_root: Option<PathBuf>,
    pub(crate) layer_stack: ConfigLayerStack,
}

impl ConfigManager {
    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        if let Some(config_path) = non_empty_env(env::CONFIG_PATH) {
            return Self::load_from_file(&config_path).with_context(|| {
                format!(
                    "Failed to load configuration from {}={}",
                    env::CONFIG_PATH,
                    config_path
                )
            });
        }

        if let Some(workspace) = non_empty_env(env::WORKSPACE) {
            return Self::load_from_workspace(&workspace).with_context(|| {
                format!(
                    "Failed to load configuration from {}={}",
                    env::WORKSPACE,
                    workspace
                )
            });
        }

        let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
        Self::load_from_workspace(cwd)
    }

    /// Load configuration from a specific workspace
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        Self::load_from_workspace_with(workspace, &ConfigDefaults::current())
    }

    /// Load configuration from a workspace using explicit discovery defaults.
    pub fn load_from_workspace_with(
        workspace: impl AsRef<Path>,
        defaults: &ConfigDefaults,
    ) -> Result<Self> {
        let workspace = workspace.as_ref();
        let workspace_paths = defaults.workspace_paths_for(workspace);
        let workspace_root = workspace_paths.workspace_root().to_path_buf();
        let config_file_name = defaults.config_file_name();

        let mut layer_stack = ConfigLayerStack::default();
        Self::push_home_layers(&mut layer_stack, defaults)?;

        // Config directory fallback (.initctx/initctx.toml)
        let fallback_path = workspace_paths.config_dir().join(config_file_name);
        if fallback_path.exists() {
            let toml = Self::load_toml_from_file(&fallback_path)?;
            layer_stack.push(ConfigLayerEntry::new(
                ConfigLayerSource::Workspace {
                    file: fallback_path,
                },
                toml,
            ));
        }

        // Workspace root config wins over the config directory
        let workspace_config_path = workspace_paths.resolve(config_file_name);
        if workspace_config_path.exists() {
            let toml = Self::load_toml_from_file(&workspace_config_path)?;
            layer_stack.push(ConfigLayerEntry::new(
                ConfigLayerSource::Workspace {
                    file: workspace_config_path,
                },
                toml,
            ));
        }

        if layer_stack.is_empty() {
            debug!(workspace = %workspace_root.display(), "no configuration layers found; using defaults");
            let config = InitCtxConfig::default();
            config
                .validate()
                .context("Default configuration failed validation")?;

            return Ok(Self {
                config,
                config_path: None,
                workspace_root: Some(workspace_root),
                layer_stack,
            });
        }

        let config = Self::evaluate(&layer_stack)?;
        let config_path = layer_stack
            .layers()
            .last()
            .and_then(|layer| layer.source.file().cloned());

        Ok(Self {
            config,
            config_path,
            workspace_root: Some(workspace_root),
            layer_stack,
        })
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_from_file_with(path, &ConfigDefaults::current())
    }

    pub fn load_from_file_with(path: impl AsRef<Path>, defaults: &ConfigDefaults) -> Result<Self> {
        let path = path.as_ref();
        let mut layer_stack = ConfigLayerStack::default();
        Self::push_home_layers(&mut layer_stack, defaults)?;

        let toml = Self::load_toml_from_file(path)?;
        layer_stack.push(ConfigLayerEntry::new(
            ConfigLayerSource::Workspace {
                file: path.to_path_buf(),
            },
            toml,
        ));

        let config = Self::evaluate(&layer_stack)
            .with_context(|| format!("Failed to load config with file: {}", path.display()))?;

        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
            workspace_root: path.parent().map(Path::to_path_buf),
            layer_stack,
        })
    }

    fn push_home_layers(layer_stack: &mut ConfigLayerStack, defaults: &ConfigDefaults) -> Result<()> {
        for home_config_path in defaults.home_config_paths() {
            if home_config_path.exists() {
                let toml = Self::load_toml_from_file(home_config_path)?;
                layer_stack.push(ConfigLayerEntry::new(
                    ConfigLayerSource::User {
                        file: home_config_path.clone(),
                    },
                    toml,
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn evaluate(layer_stack: &ConfigLayerStack) -> Result<InitCtxConfig> {
        let config: InitCtxConfig = layer_stack
            .effective_config()
            .try_into()
            .context("Failed to deserialize effective configuration")?;
        config
            .validate()
            .context("Configuration failed validation")?;
        Ok(config)
    }

    fn load_toml_from_file(path: &Path) -> Result<toml::Value> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let value: toml::Value = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(value)
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &InitCtxConfig {
        &self.config
    }

    pub fn into_config(self) -> InitCtxConfig {
        self.config
    }

    /// File of the highest-precedence layer, if it came from disk
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    pub fn layer_stack(&self) -> &ConfigLayerStack {
        &self.layer_stack
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
