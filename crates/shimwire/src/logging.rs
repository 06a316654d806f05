//! Subscriber setup for plugins that do not install their own.

use tracing_subscriber::EnvFilter;

use crate::BridgeConfig;

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` wins over [`BridgeConfig::log_filter`]; an unparsable filter
/// falls back to `info`. Returns `false` if a subscriber was already set,
/// which makes repeated calls harmless.
pub fn init_logging(config: &BridgeConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
