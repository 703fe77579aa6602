//! `Dispatcher`: Multi-clause functions with first-match-wins semantics
//!
//! # Dispatch
//!
//! 1. Look up the clauses accepting `args.len()` (built once, at `defmatch`)
//! 2. For each, in declaration order: fill defaults, match, guard
//! 3. The first clause whose guard accepts runs its body
//! 4. Nothing accepted → [`MatchError`]
//!
//! A clause with `K` defaulted parameters is registered under every arity in
//! `[arity - K, arity]`, so overloads by length are resolved by a single map
//! lookup.

use crate::clause::{Clause, ClauseHead};
use crate::trace::{ClauseStep, DispatchTrace, StepOutcome};
use crate::{MatchError, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Lazy sequence produced by a [`defmatchgen`] body.
pub type ValueStream = Box<dyn Iterator<Item = Value> + Send>;

/// A dispatcher whose bodies produce lazy sequences.
///
/// Clause selection happens when [`call`](Dispatcher::call) is invoked; the
/// returned stream is only driven by the caller. Call again to restart.
pub type GenDispatcher = Dispatcher<ValueStream>;

// ═══════════════════════════════════════════════════════════════════════════════
// Arity table
// ═══════════════════════════════════════════════════════════════════════════════

/// Anything dispatchable by its [`ClauseHead`].
pub(crate) trait Headed {
    fn head(&self) -> &ClauseHead;
}

impl<R> Headed for Clause<R> {
    fn head(&self) -> &ClauseHead {
        &self.head
    }
}

/// Arity → clauses accepting it, each tagged with its declaration index.
pub(crate) struct ArityTable<C> {
    buckets: BTreeMap<usize, Vec<(usize, Arc<C>)>>,
    len: usize,
}

impl<C: Headed> ArityTable<C> {
    pub(crate) fn new<I>(clauses: I) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        let mut buckets: BTreeMap<usize, Vec<(usize, Arc<C>)>> = BTreeMap::new();
        let mut len = 0;
        for (index, clause) in clauses.into_iter().enumerate() {
            let clause = Arc::new(clause);
            let head = clause.head();
            for arity in head.min_arity()..=head.arity() {
                buckets
                    .entry(arity)
                    .or_default()
                    .push((index, Arc::clone(&clause)));
            }
            len += 1;
        }
        Self { buckets, len }
    }
}

impl<C> ArityTable<C> {
    pub(crate) fn bucket(&self, arity: usize) -> Option<&[(usize, Arc<C>)]> {
        self.buckets.get(&arity).map(Vec::as_slice)
    }

    pub(crate) fn arities(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.keys().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Dispatcher
// ═══════════════════════════════════════════════════════════════════════════════

/// A multi-clause function.
///
/// Immutable after construction and `Send + Sync`: keep it in a `static`
/// (e.g. `LazyLock`) and call it recursively from its own bodies.
///
/// # Example
///
/// ```
/// use clausal::{clause, defaulted, defmatch, variable, Dispatcher, Value};
///
/// let add: Dispatcher<i64> = defmatch([clause([variable(), defaulted("b", 10)], |args| {
///     args.iter().filter_map(Value::as_int).sum()
/// })
/// .unwrap()]);
///
/// assert_eq!(add.call(&[Value::from(1), Value::from(2)]).unwrap(), 3);
/// assert_eq!(add.call(&[Value::from(1)]).unwrap(), 11);
/// assert!(add.call(&[]).is_err());
/// ```
pub struct Dispatcher<R> {
    table: ArityTable<Clause<R>>,
}

/// Build a dispatcher from clauses, in priority order.
pub fn defmatch<R, I>(clauses: I) -> Dispatcher<R>
where
    I: IntoIterator<Item = Clause<R>>,
{
    Dispatcher {
        table: ArityTable::new(clauses),
    }
}

/// Build a dispatcher whose bodies return lazy sequences.
///
/// # Example
///
/// ```
/// use clausal::{clause, defmatchgen, variable, Value, ValueStream};
///
/// let count_from = defmatchgen([clause([variable()], |args| -> ValueStream {
///     let start = args[0].as_int().unwrap_or(0);
///     Box::new((start..).map(Value::from))
/// })
/// .unwrap()]);
///
/// let firsts: Vec<Value> = count_from.call(&[Value::from(3)]).unwrap().take(3).collect();
/// assert_eq!(firsts, vec![Value::from(3), Value::from(4), Value::from(5)]);
/// ```
pub fn defmatchgen<I>(clauses: I) -> GenDispatcher
where
    I: IntoIterator<Item = Clause<ValueStream>>,
{
    defmatch(clauses)
}

impl<R> Dispatcher<R> {
    /// Call with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if no clause accepts `args.len()` arguments
    /// ([`ArityNotFound`](crate::MatchErrorKind::ArityNotFound)) or no clause
    /// of that arity matches ([`NoMatch`](crate::MatchErrorKind::NoMatch)).
    pub fn call(&self, args: &[Value]) -> Result<R, MatchError> {
        let Some(bucket) = self.table.bucket(args.len()) else {
            let err = MatchError::arity_not_found(args);
            tracing::debug!(arity = args.len(), error = %err, "no clause accepts this arity");
            return Err(err);
        };

        for (index, clause) in bucket {
            tracing::trace!(clause = *index, arity = args.len(), "trying clause");
            if let Some(bindings) = clause.select(args) {
                return Ok((clause.body)(&bindings));
            }
        }

        let err = MatchError::no_match(args);
        tracing::debug!(arity = args.len(), error = %err, "no clause matched");
        Err(err)
    }

    /// Call with full decision-path tracing.
    ///
    /// Returns the same result as [`call()`](Self::call) plus one
    /// [`ClauseStep`] per clause tried. Slower: keeps copies of the filled
    /// arguments and bindings. Use for debugging.
    pub fn call_with_trace(&self, args: &[Value]) -> DispatchTrace<R> {
        let mut steps = Vec::new();
        let Some(bucket) = self.table.bucket(args.len()) else {
            return DispatchTrace {
                result: Err(MatchError::arity_not_found(args)),
                arity: args.len(),
                steps,
            };
        };

        for (index, clause) in bucket {
            let filled = clause.head.fill(args);
            let Some(bindings) = clause.head.bind(&filled) else {
                steps.push(ClauseStep {
                    index: *index,
                    args: filled.into_owned(),
                    outcome: StepOutcome::PatternMismatch,
                });
                continue;
            };

            if !(clause.guard)(&bindings) {
                steps.push(ClauseStep {
                    index: *index,
                    args: filled.into_owned(),
                    outcome: StepOutcome::GuardRejected { bindings },
                });
                continue;
            }

            let result = (clause.body)(&bindings);
            steps.push(ClauseStep {
                index: *index,
                args: filled.into_owned(),
                outcome: StepOutcome::Selected { bindings },
            });
            return DispatchTrace {
                result: Ok(result),
                arity: args.len(),
                steps,
            };
        }

        DispatchTrace {
            result: Err(MatchError::no_match(args)),
            arity: args.len(),
            steps,
        }
    }

    /// Call arities this dispatcher accepts, ascending.
    pub fn arities(&self) -> impl Iterator<Item = usize> + '_ {
        self.table.arities()
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if there are no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }
}

impl<R> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("clauses", &self.table.len())
            .field("arities", &self.table.arities().collect::<Vec<_>>())
            .finish()
    }
}
