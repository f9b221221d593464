//! Shared helpers reused across the initctx crates. The goal is to keep the
//! config loader and the context core decoupled from each other while still
//! sharing HTTP client construction, path handling, and telemetry contracts.

pub mod http;
pub mod paths;
pub mod telemetry;

pub use paths::{StaticWorkspacePaths, WorkspacePaths, display_name, normalize_path};
pub use telemetry::{MemoryTelemetry, NoopTelemetry, TelemetrySink};
