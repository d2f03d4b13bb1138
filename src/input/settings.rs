//! Robot timing tunables.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::EnvConfig;

const DELAY_BETWEEN_EVENTS_MS: u64 = 60;
const EVENT_POSTING_DELAY_MS: u64 = 100;
const DRAG_DELAY_MS: u64 = 0;
const DROP_DELAY_MS: u64 = 0;
const IDLE_TIMEOUT_MS: u64 = 10_000;

/// Timing knobs for synthesized input, scoped to one robot rather than shared
/// process-wide. All fields are atomic so tests can retune a live robot.
#[derive(Debug)]
pub struct Settings {
    delay_between_events_ms: AtomicU64,
    event_posting_delay_ms: AtomicU64,
    drag_delay_ms: AtomicU64,
    drop_delay_ms: AtomicU64,
    idle_timeout_ms: AtomicU64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay_between_events_ms: AtomicU64::new(DELAY_BETWEEN_EVENTS_MS),
            event_posting_delay_ms: AtomicU64::new(EVENT_POSTING_DELAY_MS),
            drag_delay_ms: AtomicU64::new(DRAG_DELAY_MS),
            drop_delay_ms: AtomicU64::new(DROP_DELAY_MS),
            idle_timeout_ms: AtomicU64::new(IDLE_TIMEOUT_MS),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by whatever `config` carries.
    #[must_use]
    pub fn from_config(config: &EnvConfig) -> Self {
        let settings = Self::default();
        if let Some(ms) = config.delay_between_events_ms {
            settings.set_delay_between_events(Duration::from_millis(ms));
        }
        if let Some(ms) = config.event_posting_delay_ms {
            settings.set_event_posting_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = config.idle_timeout_ms {
            settings.set_idle_timeout(Duration::from_millis(ms));
        }
        settings
    }

    /// Pause inserted after every synthesized input event.
    #[must_use]
    pub fn delay_between_events(&self) -> Duration {
        self.millis(&self.delay_between_events_ms)
    }

    pub fn set_delay_between_events(&self, delay: Duration) {
        self.set_millis(&self.delay_between_events_ms, delay);
    }

    /// Allowance for a posted event to make it through the dispatch queue.
    #[must_use]
    pub fn event_posting_delay(&self) -> Duration {
        self.millis(&self.event_posting_delay_ms)
    }

    pub fn set_event_posting_delay(&self, delay: Duration) {
        self.set_millis(&self.event_posting_delay_ms, delay);
    }

    /// Pause between pressing a button and starting to drag.
    #[must_use]
    pub fn drag_delay(&self) -> Duration {
        self.millis(&self.drag_delay_ms)
    }

    pub fn set_drag_delay(&self, delay: Duration) {
        self.set_millis(&self.drag_delay_ms, delay);
    }

    /// Pause between dragging over the destination and releasing.
    #[must_use]
    pub fn drop_delay(&self) -> Duration {
        self.millis(&self.drop_delay_ms)
    }

    pub fn set_drop_delay(&self, delay: Duration) {
        self.set_millis(&self.drop_delay_ms, delay);
    }

    /// Longest the robot waits for the dispatch queue to drain.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.millis(&self.idle_timeout_ms)
    }

    pub fn set_idle_timeout(&self, timeout: Duration) {
        self.set_millis(&self.idle_timeout_ms, timeout);
    }

    fn millis(&self, field: &AtomicU64) -> Duration {
        Duration::from_millis(field.load(Ordering::SeqCst))
    }

    fn set_millis(&self, field: &AtomicU64, value: Duration) {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        field.store(millis, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let settings = Settings::new();
        assert_eq!(settings.delay_between_events(), Duration::from_millis(60));
        assert_eq!(settings.event_posting_delay(), Duration::from_millis(100));
        assert_eq!(settings.drag_delay(), Duration::ZERO);
        assert_eq!(settings.drop_delay(), Duration::ZERO);
        assert_eq!(settings.idle_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn setters_apply_live() {
        let settings = Settings::new();
        settings.set_delay_between_events(Duration::ZERO);
        settings.set_drag_delay(Duration::from_millis(200));
        assert_eq!(settings.delay_between_events(), Duration::ZERO);
        assert_eq!(settings.drag_delay(), Duration::from_millis(200));
    }

    #[test]
    fn oversized_durations_saturate_instead_of_wrapping() {
        let settings = Settings::new();
        settings.set_idle_timeout(Duration::MAX);
        assert_eq!(settings.idle_timeout(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn config_overrides_only_what_it_carries() {
        let config = EnvConfig {
            delay_between_events_ms: Some(0),
            event_posting_delay_ms: None,
            idle_timeout_ms: Some(1500),
            headless: false,
        };
        let settings = Settings::from_config(&config);
        assert_eq!(settings.delay_between_events(), Duration::ZERO);
        assert_eq!(settings.event_posting_delay(), Duration::from_millis(100));
        assert_eq!(settings.idle_timeout(), Duration::from_millis(1500));
    }
}
