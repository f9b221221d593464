use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::defaults::ConfigDefaults;
use crate::loader::layers::{ConfigLayerEntry, ConfigLayerSource};
use crate::loader::manager::ConfigManager;

/// Builder for creating a [`ConfigManager`] with custom overrides.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    workspace: Option<PathBuf>,
    config_file: Option<PathBuf>,
    defaults: Option<ConfigDefaults>,
    cli_overrides: Vec<(String, toml::Value)>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the workspace directory.
    pub fn workspace(mut self, path: PathBuf) -> Self {
        self.workspace = Some(path);
        self
    }

    /// Use a specific configuration file instead of workspace discovery.
    pub fn config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    /// Replace the home-directory discovery rules.
    pub fn defaults(mut self, defaults: ConfigDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Add overrides written as `key=value`.
    ///
    /// Values are parsed as TOML. If parsing fails, they are treated as strings.
    pub fn cli_overrides(mut self, overrides: &[String]) -> Result<Self> {
        for raw in overrides {
            let Some((key, value)) = raw.split_once('=') else {
                bail!("Override `{raw}` must use the form key=value");
            };
            let key = key.trim();
            if key.is_empty() {
                bail!("Override `{raw}` has an empty key");
            }
            self.cli_overrides
                .push((key.to_string(), parse_override_value(value.trim())));
        }
        Ok(self)
    }

    /// Build the [`ConfigManager`].
    pub fn build(self) -> Result<ConfigManager> {
        let defaults = self.defaults.unwrap_or_else(ConfigDefaults::current);

        let mut manager = match (self.config_file, self.workspace) {
            (Some(config_file), _) => ConfigManager::load_from_file_with(config_file, &defaults)?,
            (None, Some(workspace)) => ConfigManager::load_from_workspace_with(workspace, &defaults)?,
            (None, None) => {
                let cwd =
                    std::env::current_dir().context("Failed to resolve current directory")?;
                ConfigManager::load_from_workspace_with(cwd, &defaults)?
            }
        };

        if !self.cli_overrides.is_empty() {
            let mut runtime_toml = toml::Table::new();
            for (key, value) in self.cli_overrides {
                insert_dotted_key(&mut runtime_toml, &key, value);
            }

            manager.layer_stack.push(ConfigLayerEntry::new(
                ConfigLayerSource::Runtime,
                toml::Value::Table(runtime_toml),
            ));
            manager.config = ConfigManager::evaluate(&manager.layer_stack)
                .context("Configuration failed validation after runtime overrides")?;
        }

        Ok(manager)
    }
}

/// Parses an override value as a TOML literal, falling back to a plain string
/// so `server.endpoint=http://host` works without quoting.
fn parse_override_value(raw: &str) -> toml::Value {
    let wrapped = format!("value = {raw}");
    toml::from_str::<toml::Table>(&wrapped)
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}

fn insert_dotted_key(table: &mut toml::Table, key: &str, value: toml::Value) {
    let mut parts: Vec<&str> = key.split('.').collect();
    let Some(last) = parts.pop() else {
        return;
    };

    let mut current = table;
    for part in parts {
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        if !entry.is_table() {
            *entry = toml::Value::Table(toml::Table::new());
        }
        let toml::Value::Table(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert(last.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_values_parse_as_toml_or_string() {
        assert_eq!(parse_override_value("false"), toml::Value::Boolean(false));
        assert_eq!(parse_override_value("12"), toml::Value::Integer(12));
        assert_eq!(
            parse_override_value("http://127.0.0.1:9"),
            toml::Value::String("http://127.0.0.1:9".to_string())
        );
    }

    #[test]
    fn dotted_keys_create_nested_tables() {
        let mut table = toml::Table::new();
        insert_dotted_key(&mut table, "context.include_selection", toml::Value::Boolean(false));
        let context = table.get("context").and_then(|v| v.as_table()).unwrap();
        assert_eq!(
            context.get("include_selection"),
            Some(&toml::Value::Boolean(false))
        );
    }
}
