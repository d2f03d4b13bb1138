//! Dispatch thread ownership and the FIFO queue feeding it.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle, ThreadId};

use tracing::{debug, trace};

enum Unit {
    Action(Box<dyn FnOnce() + Send>),
    Shutdown,
}

#[derive(Default)]
struct EventQueue {
    pending: Mutex<VecDeque<Unit>>,
    cvar: Condvar,
}

impl EventQueue {
    fn post(&self, unit: Unit) {
        let mut pending = match self.pending.lock() {
            Ok(pending) => pending,
            Err(poisoned) => poisoned.into_inner(),
        };
        pending.push_back(unit);
        self.cvar.notify_one();
    }

    fn wait_next(&self) -> Unit {
        let mut pending = match self.pending.lock() {
            Ok(pending) => pending,
            Err(poisoned) => poisoned.into_inner(),
        };
        loop {
            if let Some(unit) = pending.pop_front() {
                return unit;
            }
            pending = self
                .cvar
                .wait(pending)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }
}

/// Owns the dispatch thread: a dedicated worker draining a FIFO queue.
///
/// Semantics:
/// - Units posted from any thread run in posting order.
/// - The worker runs one unit at a time; each unit is a discrete critical
///   section over the widget graph.
/// - A panicking unit is contained; the worker keeps draining.
/// - Dropping the handle queues a shutdown behind everything already posted
///   and joins the worker.
pub struct UiThread {
    queue: Arc<EventQueue>,
    worker: Option<JoinHandle<()>>,
    worker_id: ThreadId,
}

impl UiThread {
    #[must_use]
    pub fn new() -> Self {
        let queue = Arc::new(EventQueue::default());
        let worker_queue = Arc::clone(&queue);
        let worker = thread::Builder::new()
            .name("gantry-dispatch".to_string())
            .spawn(move || dispatch_loop(&worker_queue))
            .expect("failed to spawn dispatch thread");
        let worker_id = worker.thread().id();
        Self {
            queue,
            worker: Some(worker),
            worker_id,
        }
    }

    /// Whether the calling thread is this dispatcher's worker thread.
    #[must_use]
    pub fn is_dispatch_thread(&self) -> bool {
        thread::current().id() == self.worker_id
    }

    /// Posts `action` to run after everything already queued. Never blocks.
    pub fn invoke_later(&self, action: impl FnOnce() + Send + 'static) {
        self.queue.post(Unit::Action(Box::new(action)));
    }
}

impl Default for UiThread {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        self.queue.post(Unit::Shutdown);
        let Some(worker) = self.worker.take() else {
            return;
        };
        // Joining from the worker itself would deadlock.
        if thread::current().id() == self.worker_id {
            return;
        }
        if worker.join().is_err() {
            debug!("dispatch thread terminated with a panic");
        }
    }
}

fn dispatch_loop(queue: &EventQueue) {
    trace!("dispatch thread started");
    loop {
        match queue.wait_next() {
            Unit::Action(action) => {
                // Marshalled wrappers store their own failures; this contains
                // panics from bare invoke_later closures.
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(action));
                if outcome.is_err() {
                    debug!("posted action panicked; dispatch thread continues");
                }
            }
            Unit::Shutdown => break,
        }
    }
    trace!("dispatch thread stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::dispatch::latch::OneShotLatch;

    #[test]
    fn posted_actions_run_in_posting_order() {
        let ui = UiThread::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for index in 0..16 {
            let order = Arc::clone(&order);
            ui.invoke_later(move || order.lock().unwrap().push(index));
        }
        let done = Arc::new(OneShotLatch::new());
        let opener = Arc::clone(&done);
        ui.invoke_later(move || opener.open());
        done.wait();

        assert_eq!(*order.lock().unwrap(), (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn actions_observe_the_dispatch_thread() {
        let ui = Arc::new(UiThread::new());
        assert!(!ui.is_dispatch_thread());

        let observed = Arc::new(AtomicBool::new(false));
        let done = Arc::new(OneShotLatch::new());
        let (ui_probe, observed_probe, opener) =
            (Arc::clone(&ui), Arc::clone(&observed), Arc::clone(&done));
        ui.invoke_later(move || {
            observed_probe.store(ui_probe.is_dispatch_thread(), Ordering::SeqCst);
            opener.open();
        });
        done.wait();
        assert!(observed.load(Ordering::SeqCst));
    }

    #[test]
    fn a_panicking_action_does_not_kill_the_worker() {
        let ui = UiThread::new();
        ui.invoke_later(|| panic!("boom"));

        let done = Arc::new(OneShotLatch::new());
        let opener = Arc::clone(&done);
        ui.invoke_later(move || opener.open());
        assert!(done.wait_timeout(Duration::from_secs(5)));
    }

    #[test]
    fn drop_drains_already_posted_actions() {
        let ui = UiThread::new();
        let ran = Arc::new(AtomicBool::new(false));
        let probe = Arc::clone(&ran);
        ui.invoke_later(move || {
            thread::sleep(Duration::from_millis(30));
            probe.store(true, Ordering::SeqCst);
        });
        drop(ui);
        assert!(ran.load(Ordering::SeqCst));
    }
}
