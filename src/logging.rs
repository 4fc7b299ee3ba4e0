use std::io::IsTerminal;

use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

/// Installs the global fmt subscriber for the `scout` binary.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (usually
/// `ScoutConfig::log_filter`) applies. Logs go to stderr so stdout stays free
/// for query output, and colors are dropped when stderr is redirected.
pub fn init_tracing(default_filter: &str) -> Result<(), anyhow::Error> {
    SubscriberBuilder::default()
        .with_env_filter(log_filter(default_filter))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))
}

fn log_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
