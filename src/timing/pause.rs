//! Blocking wait loops.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::timing::condition::Condition;
use crate::timing::timeout_watch::TimeoutWatch;

/// Interval between condition polls.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Timeout applied by [`pause`] when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Waits for `condition` with the [`DEFAULT_TIMEOUT`].
pub fn pause(condition: &mut dyn Condition) -> Result<()> {
    pause_with_timeout(condition, DEFAULT_TIMEOUT)
}

/// Polls `condition` every 10 ms on the calling thread until it holds or
/// `timeout` expires.
///
/// `condition.done()` runs exactly once in both outcomes. A timeout reports
/// [`Error::WaitTimedOut`] carrying the condition's description; whatever the
/// condition was observing is not cancelled and may still become true later.
pub fn pause_with_timeout(condition: &mut dyn Condition, timeout: Duration) -> Result<()> {
    let watch = TimeoutWatch::start(timeout);
    while !condition.test() {
        if watch.is_timed_out() {
            let description = condition.description();
            condition.done();
            debug!(%description, ?timeout, "wait timed out");
            return Err(Error::wait_timed_out(description));
        }
        thread::sleep(POLL_INTERVAL);
    }
    condition.done();
    Ok(())
}

/// Sleeps the calling thread for `duration`. Zero is a no-op.
pub fn pause_for(duration: Duration) {
    if duration.is_zero() {
        return;
    }
    thread::sleep(duration);
}
