//! Debug and tracing configuration

use serde::{Deserialize, Serialize};

/// Trace level for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl TraceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

impl std::fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TraceLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DebugConfig {
    #[serde(default)]
    pub trace_level: TraceLevel,
    /// Targets the level applies to. Empty means the initctx crates.
    #[serde(default)]
    pub trace_targets: Vec<String>,
}

impl DebugConfig {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn filter_directive(&self, default_targets: &[&str]) -> String {
        let level = self.trace_level.as_str();
        let targets: Vec<&str> = if self.trace_targets.is_empty() {
            default_targets.to_vec()
        } else {
            self.trace_targets.iter().map(String::as_str).collect()
        };
        targets
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}
