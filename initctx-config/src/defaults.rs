use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use initctx_commons::StaticWorkspacePaths;
use std::path::{Path, PathBuf};

/// Where configuration files are discovered. Tests construct this directly so
/// they never read the real home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDefaults {
    home_paths: Vec<PathBuf>,
    config_file_name: String,
}

impl ConfigDefaults {
    /// Defaults for the running user: `~/.initctx/initctx.toml`.
    pub fn current() -> Self {
        let home_paths = dirs::home_dir()
            .map(|home| vec![home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)])
            .unwrap_or_default();
        Self {
            home_paths,
            config_file_name: CONFIG_FILE_NAME.to_string(),
        }
    }

    pub fn with_home_paths(mut self, home_paths: Vec<PathBuf>) -> Self {
        self.home_paths = home_paths;
        self
    }

    pub fn home_config_paths(&self) -> &[PathBuf] {
        &self.home_paths
    }

    pub fn config_file_name(&self) -> &str {
        &self.config_file_name
    }

    pub fn workspace_paths_for(&self, workspace: &Path) -> StaticWorkspacePaths {
        StaticWorkspacePaths::new(workspace, workspace.join(CONFIG_DIR_NAME))
    }
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self::current()
    }
}
