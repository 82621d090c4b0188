use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
/// Calling this twice is harmless.
pub fn init(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = fmt::layer().with_target(true).with_thread_ids(false);

    if let Err(e) = Registry::default().with(env_filter).with(stdout_layer).try_init() {
        tracing::debug!("tracing subscriber already installed: {e}");
    }
}
