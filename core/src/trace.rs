//! Dispatch trace types for debugging clause selection.
//!
//! A [`DispatchTrace`] mirrors one [`Dispatcher::call`](crate::Dispatcher::call):
//! which clauses were tried, with which (default-filled) arguments, and why
//! each was passed over. Use
//! [`Dispatcher::call_with_trace`](crate::Dispatcher::call_with_trace) to get it.
//!
//! # Example
//!
//! ```ignore
//! let trace = dispatcher.call_with_trace(&args);
//! println!("Result: {:?}", trace.result);
//! for step in &trace.steps {
//!     println!("  clause[{}]: {:?}", step.index, step.outcome);
//! }
//! ```

use crate::{MatchError, Value};
use std::fmt;

/// Trace of a full dispatch.
///
/// # INV: `result` == `call()` result
///
/// Steps stop at the selected clause (first-match-wins is preserved).
pub struct DispatchTrace<R> {
    /// The final result (identical to what `call()` returns).
    pub result: Result<R, MatchError>,
    /// Number of arguments the call was made with.
    pub arity: usize,
    /// One step per clause tried, in order.
    pub steps: Vec<ClauseStep>,
}

impl<R> DispatchTrace<R> {
    /// Declaration index of the selected clause, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.steps
            .iter()
            .find(|s| matches!(s.outcome, StepOutcome::Selected { .. }))
            .map(|s| s.index)
    }
}

impl<R: fmt::Debug> fmt::Debug for DispatchTrace<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTrace")
            .field("result", &self.result)
            .field("arity", &self.arity)
            .field("steps", &self.steps)
            .finish()
    }
}

/// One clause attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseStep {
    /// Position of the clause in the `defmatch` list (0-based).
    pub index: usize,
    /// Arguments after default filling.
    pub args: Vec<Value>,
    /// What happened.
    pub outcome: StepOutcome,
}

/// Result of trying one clause.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Parameter patterns did not match (including named conflicts).
    PatternMismatch,
    /// Patterns matched but the guard returned `false`.
    GuardRejected {
        /// Bindings the guard saw.
        bindings: Vec<Value>,
    },
    /// Clause selected; the body ran with these bindings.
    Selected {
        /// Bindings passed to the body.
        bindings: Vec<Value>,
    },
}
