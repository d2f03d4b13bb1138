//! Environment configuration.

use std::env;

use once_cell::sync::Lazy;

static ENV_CONFIG: Lazy<EnvConfig> = Lazy::new(EnvConfig::from_env);

/// Tunables read from the process environment.
///
/// Millisecond values override the built-in defaults of
/// [`Settings`](crate::input::Settings); absent or unparseable variables leave
/// the defaults in place. The default value carries no overrides at all.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub delay_between_events_ms: Option<u64>,
    pub event_posting_delay_ms: Option<u64>,
    pub idle_timeout_ms: Option<u64>,
    pub headless: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            delay_between_events_ms: env_millis("GANTRY_DELAY_BETWEEN_EVENTS"),
            event_posting_delay_ms: env_millis("GANTRY_EVENT_POSTING_DELAY"),
            idle_timeout_ms: env_millis("GANTRY_IDLE_TIMEOUT_MS"),
            headless: env_flag("GANTRY_HEADLESS"),
        }
    }
}

/// Environment snapshot taken once per process, on first use.
pub fn env_config() -> &'static EnvConfig {
    &ENV_CONFIG
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_millis(key: &str) -> Option<u64> {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
}
