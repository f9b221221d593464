use anyhow::Result;
use initctx_config::InitCtxConfig;

/// Targets traced when `[debug] trace_targets` is empty.
const DEFAULT_TRACE_TARGETS: &[&str] = &["initctx", "initctx_core", "initctx_config"];

/// Installs a stderr subscriber filtered by `RUST_LOG`. Returns false, and
/// installs nothing, when the variable is unset.
pub(crate) fn initialize_tracing() -> Result<bool> {
    if std::env::var("RUST_LOG").is_err() {
        return Ok(false);
    }
    install_subscriber(tracing_subscriber::EnvFilter::from_default_env());
    Ok(true)
}

/// Installs a stderr subscriber filtered by the `[debug]` section.
pub(crate) fn initialize_tracing_from_config(config: &InitCtxConfig) -> Result<()> {
    let directive = config.debug.filter_directive(DEFAULT_TRACE_TARGETS);
    let env_filter = tracing_subscriber::EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    install_subscriber(env_filter);
    Ok(())
}

fn install_subscriber(env_filter: tracing_subscriber::EnvFilter) {
    use tracing_subscriber::prelude::*;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let init_result = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();

    if let Err(err) = init_result {
        tracing::warn!(error = %err, "tracing already initialized; skipping tracing setup");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use initctx_config::TraceLevel;

    #[test]
    fn config_directive_covers_all_crates_by_default() {
        let mut config = InitCtxConfig::default();
        config.debug.trace_level = TraceLevel::Debug;
        assert_eq!(
            config.debug.filter_directive(DEFAULT_TRACE_TARGETS),
            "initctx=debug,initctx_core=debug,initctx_config=debug"
        );
    }

    #[test]
    fn second_initialization_is_tolerated() {
        let config = InitCtxConfig::default();
        assert!(initialize_tracing_from_config(&config).is_ok());
        assert!(initialize_tracing_from_config(&config).is_ok());
    }
}
