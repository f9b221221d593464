use serde::{Deserialize, Serialize};

/// Which mentions are populated automatically in a fresh chat input.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct ContextConfig {
    #[serde(default = "default_true")]
    pub include_repository: bool,
    #[serde(default = "default_true")]
    pub include_file: bool,
    /// Add a `file:start-end` mention while lines are selected.
    #[serde(default = "default_true")]
    pub include_selection: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            include_repository: true,
            include_file: true,
            include_selection: true,
        }
    }
}

fn default_true() -> bool {
    true
}
