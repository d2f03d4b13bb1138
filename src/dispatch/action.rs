//! Reusable wrappers around units of work bound for the dispatch thread.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{BoxError, Error, Result};

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> BoxError {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string().into();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone().into();
    }
    "panic with non-string payload".into()
}

type QueryBody<T> = Box<dyn FnMut() -> std::result::Result<T, BoxError> + Send>;

struct Slots<T> {
    executed: bool,
    caught: Option<BoxError>,
    result: Option<T>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            executed: false,
            caught: None,
            result: None,
        }
    }
}

struct QueryCore<T> {
    body: Mutex<QueryBody<T>>,
    slots: Mutex<Slots<T>>,
}

/// Reusable wrapper around a closure that produces a value on the dispatch
/// thread.
///
/// Semantics:
/// - The wrapper can be submitted any number of times; each run stores its
///   value or error in slots, and the runner clears each slot as it reads it.
/// - A panic inside the body lands in the error slot like any other failure.
/// - [`was_executed`](Query::was_executed) turns true after the first
///   completed run and stays true.
/// - Clones are cheap handles sharing the same body and slots.
pub struct Query<T> {
    core: Arc<QueryCore<T>>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T: Send + 'static> Query<T> {
    /// Wraps an infallible closure.
    pub fn new(mut body: impl FnMut() -> T + Send + 'static) -> Self {
        Self::fallible(move || Ok(body()))
    }

    /// Wraps a closure that may fail. The error lands in the caught slot and
    /// is rethrown on the submitting thread.
    pub fn fallible(
        body: impl FnMut() -> std::result::Result<T, BoxError> + Send + 'static,
    ) -> Self {
        Self {
            core: Arc::new(QueryCore {
                body: Mutex::new(Box::new(body)),
                slots: Mutex::new(Slots::default()),
            }),
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots<T>> {
        self.core
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether a marshalled run of this wrapper has completed.
    #[must_use]
    pub fn was_executed(&self) -> bool {
        self.slots().executed
    }

    /// Runs the body on the calling thread and stores the outcome in the
    /// slots. Failures, panics included, are captured rather than propagated.
    pub(crate) fn run_now(&self) {
        let outcome = {
            let mut body = self
                .core
                .body
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (*body)()))
        };
        let mut slots = self.slots();
        match outcome {
            Ok(Ok(value)) => slots.result = Some(value),
            Ok(Err(error)) => slots.caught = Some(error),
            Err(payload) => slots.caught = Some(panic_message(payload)),
        }
        slots.executed = true;
    }

    /// Runs the body synchronously without touching the slots, surfacing
    /// failures directly on the calling thread.
    pub(crate) fn run_in_current_thread(&self) -> Result<T> {
        let outcome = {
            let mut body = self
                .core
                .body
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (*body)()))
        };
        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(Error::unexpected(error)),
            Err(payload) => Err(Error::unexpected(panic_message(payload))),
        }
    }

    /// Takes the stored value, leaving the slot empty.
    pub(crate) fn take_result(&self) -> Option<T> {
        self.slots().result.take()
    }

    /// Takes the stored error, leaving the slot empty.
    pub(crate) fn take_caught(&self) -> Option<BoxError> {
        self.slots().caught.take()
    }
}

/// Reusable wrapper around a closure that performs an effect on the dispatch
/// thread. Shares the slot semantics of [`Query`].
#[derive(Clone)]
pub struct Task {
    inner: Query<()>,
}

impl Task {
    /// Wraps an infallible closure.
    pub fn new(mut body: impl FnMut() + Send + 'static) -> Self {
        Self {
            inner: Query::new(move || body()),
        }
    }

    /// Wraps a closure that may fail.
    pub fn fallible(
        body: impl FnMut() -> std::result::Result<(), BoxError> + Send + 'static,
    ) -> Self {
        Self {
            inner: Query::fallible(body),
        }
    }

    /// Whether a marshalled run of this wrapper has completed.
    #[must_use]
    pub fn was_executed(&self) -> bool {
        self.inner.was_executed()
    }

    pub(crate) fn as_query(&self) -> &Query<()> {
        &self.inner
    }
}
