use crate::loader::merge_toml_values;
use std::path::PathBuf;
use toml::Value as TomlValue;

/// Source of a configuration layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-specific configuration (e.g., ~/.initctx/initctx.toml)
    User { file: PathBuf },
    /// Workspace configuration, either `.initctx/initctx.toml` or the root file
    Workspace { file: PathBuf },
    /// Runtime overrides (e.g., `-c key=value` flags)
    Runtime,
}

impl ConfigLayerSource {
    pub fn file(&self) -> Option<&PathBuf> {
        match self {
            Self::User { file } | Self::Workspace { file } => Some(file),
            Self::Runtime => None,
        }
    }
}

/// A single layer of configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayerEntry {
    pub source: ConfigLayerSource,
    pub config: TomlValue,
}

impl ConfigLayerEntry {
    pub fn new(source: ConfigLayerSource, config: TomlValue) -> Self {
        Self { source, config }
    }
}

/// A stack of configuration layers, ordered from lowest to highest precedence.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayerStack {
    layers: Vec<ConfigLayerEntry>,
}

impl ConfigLayerStack {
    pub fn push(&mut self, layer: ConfigLayerEntry) {
        self.layers.push(layer);
    }

    /// Merge all layers into a single effective configuration.
    pub fn effective_config(&self) -> TomlValue {
        let mut merged = TomlValue::Table(toml::Table::new());
        for layer in &self.layers {
            merge_toml_values(&mut merged, &layer.config);
        }
        merged
    }

    pub fn layers(&self) -> &[ConfigLayerEntry] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
