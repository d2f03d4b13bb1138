//! Pollable wait conditions.

/// State that a wait loop polls until it holds or the wait expires.
///
/// Semantics:
/// - `test` may be called any number of times, from the waiting thread only.
/// - `done` runs exactly once after the final `test`, whether the wait
///   succeeded or timed out, and is the place to release anything the
///   condition holds on to.
pub trait Condition {
    /// Checks whether the condition is now satisfied.
    fn test(&mut self) -> bool;

    /// Description used in timeout errors, e.g. `"frame to be showing"`.
    fn description(&self) -> String;

    /// Releases resources owned by the condition.
    fn done(&mut self) {}
}

/// Condition backed by a closure.
pub struct FnCondition<F> {
    description: String,
    probe: F,
}

impl<F> FnCondition<F>
where
    F: FnMut() -> bool,
{
    pub fn new(description: impl Into<String>, probe: F) -> Self {
        Self {
            description: description.into(),
            probe,
        }
    }
}

impl<F> Condition for FnCondition<F>
where
    F: FnMut() -> bool,
{
    fn test(&mut self) -> bool {
        (self.probe)()
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Builds a [`Condition`] from a description and a probe closure.
pub fn condition<F>(description: impl Into<String>, probe: F) -> FnCondition<F>
where
    F: FnMut() -> bool,
{
    FnCondition::new(description, probe)
}
