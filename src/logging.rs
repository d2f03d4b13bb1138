//! Opt-in log output for programs embedding the crate.

use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered by `RUST_LOG`, falling back to
/// `warn` when the variable is unset or invalid.
///
/// Install is best-effort: if a subscriber is already set, the existing one
/// wins. Tests install their own subscribers instead of calling this.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
