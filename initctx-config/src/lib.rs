//! Config loader shared by the initctx binary and library consumers.
//!
//! Configuration lives in `initctx.toml`. Layers are merged from lowest to
//! highest precedence: the user's home config, the workspace config
//! directory (`.initctx/initctx.toml`), the workspace root file, and finally
//! runtime overrides passed on the command line.
//!
//! ```toml
//! [server]
//! endpoint = "https://code.example.internal"
//!
//! [repository]
//! self_serve_hosts = ["github.com", "gitlab.com"]
//!
//! [context]
//! include_selection = true
//! ```

pub mod constants;
pub mod context;
pub mod debug;
pub mod defaults;
pub mod loader;
pub mod repository;
pub mod server;

pub use context::ContextConfig;
pub use debug::{DebugConfig, TraceLevel};
pub use defaults::ConfigDefaults;
pub use loader::{ConfigBuilder, ConfigManager, InitCtxConfig};
pub use repository::RepositoryConfig;
pub use server::ServerConfig;
