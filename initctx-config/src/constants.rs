/// Configuration file looked up in the workspace root and config directories.
pub const CONFIG_FILE_NAME: &str = "initctx.toml";

/// Per-workspace and per-user configuration directory name.
pub const CONFIG_DIR_NAME: &str = ".initctx";

pub mod env {
    /// Explicit configuration file, bypassing workspace discovery.
    pub const CONFIG_PATH: &str = "INITCTX_CONFIG_PATH";
    /// Workspace root used when no directory is passed explicitly.
    pub const WORKSPACE: &str = "INITCTX_WORKSPACE";
    /// Default variable holding the backend access token.
    pub const ACCESS_TOKEN: &str = "INITCTX_ACCESS_TOKEN";
}

pub mod server {
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
}

pub mod repository {
    pub const DEFAULT_PREFERRED_REMOTE: &str = "origin";
    pub const DEFAULT_SELF_SERVE_HOSTS: &[&str] = &["github.com", "gitlab.com"];
}
