//! Submits wrapped actions to the dispatch thread and relays their outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::dispatch::action::{Query, Task};
use crate::dispatch::latch::OneShotLatch;
use crate::dispatch::ui_thread::UiThread;
use crate::error::{Error, Result};
use crate::timing::{pause, Condition};

/// Hands wrapped units of work to the dispatch thread and blocks the caller
/// until they finish.
///
/// Marshalling can be switched off per runner, in which case bodies run
/// synchronously on the calling thread; useful for unit tests that want
/// failures to surface without a thread hop. The switch is scoped to this
/// runner instance, never the process.
pub struct ActionRunner {
    ui: Arc<UiThread>,
    marshal: AtomicBool,
}

impl ActionRunner {
    #[must_use]
    pub fn new(ui: Arc<UiThread>) -> Self {
        Self {
            ui,
            marshal: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn ui_thread(&self) -> &Arc<UiThread> {
        &self.ui
    }

    /// Whether bodies run on the dispatch thread (the default) or in place on
    /// the calling thread.
    #[must_use]
    pub fn marshals(&self) -> bool {
        self.marshal.load(Ordering::SeqCst)
    }

    pub fn set_marshalling(&self, enabled: bool) {
        self.marshal.store(enabled, Ordering::SeqCst);
    }

    /// Runs `task` on the dispatch thread, blocking until it completes. A
    /// failure inside the body is rethrown here wrapped as
    /// [`Error::Unexpected`], and the error slot is left empty.
    pub fn execute(&self, task: &Task) -> Result<()> {
        self.execute_query(task.as_query())
    }

    /// Runs `query` on the dispatch thread, blocking until its value is
    /// available. Value and error slots are cleared as they are read.
    ///
    /// When called from the dispatch thread itself the body runs in place,
    /// synchronously; nested submissions never deadlock.
    pub fn execute_query<T: Send + 'static>(&self, query: &Query<T>) -> Result<T> {
        if !self.marshals() {
            return query.run_in_current_thread();
        }
        self.submit_and_wait(query);
        Self::outcome_of(query)
    }

    /// Like [`execute`](Self::execute), but gives up waiting after `timeout`
    /// with [`Error::WaitTimedOut`].
    ///
    /// The queued task is not cancelled by the timeout: it may still run and
    /// complete afterwards, and its slots then hold that outcome until the
    /// next run or read.
    pub fn execute_with_timeout(&self, task: &Task, timeout: Duration) -> Result<()> {
        let query = task.as_query();
        if !self.marshals() {
            return query.run_in_current_thread();
        }
        if self.ui.is_dispatch_thread() {
            query.run_now();
            return Self::outcome_of(query);
        }
        let handoff = self.submit(query);
        if !handoff.wait_timeout(timeout) {
            trace!(?timeout, "gave up waiting for task on the dispatch thread");
            return Err(Error::wait_timed_out(
                "action to be executed on the dispatch thread",
            ));
        }
        Self::outcome_of(query)
    }

    /// Runs `task`, then waits for `to_wait_for` with the default pause
    /// timeout. The task's failure, if any, is rethrown before the wait
    /// starts.
    pub fn execute_then_wait(&self, task: &Task, to_wait_for: &mut dyn Condition) -> Result<()> {
        self.execute(task)?;
        pause(to_wait_for)
    }

    fn submit<T: Send + 'static>(&self, query: &Query<T>) -> Arc<OneShotLatch> {
        let handoff = Arc::new(OneShotLatch::new());
        let opener = Arc::clone(&handoff);
        let runnable = query.clone();
        self.ui.invoke_later(move || {
            runnable.run_now();
            opener.open();
        });
        handoff
    }

    fn submit_and_wait<T: Send + 'static>(&self, query: &Query<T>) {
        if self.ui.is_dispatch_thread() {
            query.run_now();
            return;
        }
        self.submit(query).wait();
    }

    fn outcome_of<T: Send + 'static>(query: &Query<T>) -> Result<T> {
        let result = query.take_result();
        if let Some(caught) = query.take_caught() {
            return Err(Error::unexpected(caught));
        }
        match result {
            Some(value) => Ok(value),
            None => Err(Error::unexpected("query finished without a value")),
        }
    }
}

/// Condition satisfied once `task` has completed a run on the dispatch
/// thread. [`Condition::done`] drops the held handle.
pub struct ExecutedCondition {
    action: Option<Task>,
}

/// Builds a condition over `task` for use with [`crate::timing::pause`],
/// pairing with [`UiThread::invoke_later`] for fire-then-wait submissions.
#[must_use]
pub fn until_executed(task: &Task) -> ExecutedCondition {
    ExecutedCondition {
        action: Some(task.clone()),
    }
}

impl Condition for ExecutedCondition {
    fn test(&mut self) -> bool {
        self.action
            .as_ref()
            .is_some_and(|action| action.was_executed())
    }

    fn description(&self) -> String {
        "action to be executed on the dispatch thread".to_string()
    }

    fn done(&mut self) {
        self.action = None;
    }
}
