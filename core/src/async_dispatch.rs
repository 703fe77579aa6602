//! `AsyncDispatcher`: Multi-clause functions with asynchronous guards and bodies
//!
//! Same selection rules as [`Dispatcher`](crate::Dispatcher): clauses are
//! tried strictly in declaration order and each guard is awaited before the
//! next clause is considered. No timeouts, no cancellation.

use crate::clause::ClauseHead;
use crate::dispatch::{ArityTable, Headed};
use crate::{MatchError, Pattern, PatternError, Value};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, sendable future.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

type AsyncGuard = Arc<dyn Fn(Vec<Value>) -> BoxFuture<bool> + Send + Sync>;
type AsyncBody<R> = Arc<dyn Fn(Vec<Value>) -> BoxFuture<R> + Send + Sync>;

/// A clause whose guard and body are asynchronous.
///
/// Guards and bodies receive an owned copy of the bindings so the futures
/// they return can outlive the call frame.
pub struct AsyncClause<R> {
    head: ClauseHead,
    guard: Option<AsyncGuard>,
    body: AsyncBody<R>,
}

/// Build an asynchronous clause.
///
/// # Errors
///
/// Returns [`PatternError`] if any parameter pattern is malformed.
pub fn async_clause<R, I, P, F, Fut>(params: I, body: F) -> Result<AsyncClause<R>, PatternError>
where
    I: IntoIterator<Item = P>,
    P: Into<Pattern>,
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: 'static,
{
    Ok(AsyncClause {
        head: ClauseHead::new(params)?,
        guard: None,
        body: Arc::new(move |bindings: Vec<Value>| -> BoxFuture<R> {
            Box::pin(body(bindings))
        }),
    })
}

impl<R> AsyncClause<R> {
    /// Only select this clause when `guard` resolves to `true`.
    #[must_use]
    pub fn when<G, Fut>(mut self, guard: G) -> Self
    where
        G: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.guard = Some(Arc::new(move |bindings: Vec<Value>| -> BoxFuture<bool> {
            Box::pin(guard(bindings))
        }));
        self
    }
}

impl<R> Headed for AsyncClause<R> {
    fn head(&self) -> &ClauseHead {
        &self.head
    }
}

impl<R> fmt::Debug for AsyncClause<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncClause")
            .field("head", &self.head)
            .field("guarded", &self.guard.is_some())
            .finish_non_exhaustive()
    }
}

/// A multi-clause function with asynchronous guards and bodies.
pub struct AsyncDispatcher<R> {
    table: ArityTable<AsyncClause<R>>,
}

/// Build an asynchronous dispatcher from clauses, in priority order.
pub fn defmatch_async<R, I>(clauses: I) -> AsyncDispatcher<R>
where
    I: IntoIterator<Item = AsyncClause<R>>,
{
    AsyncDispatcher {
        table: ArityTable::new(clauses),
    }
}

impl<R> AsyncDispatcher<R> {
    /// Call with `args`, awaiting guards one clause at a time.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] when no clause accepts `args`.
    pub async fn call(&self, args: &[Value]) -> Result<R, MatchError> {
        let Some(bucket) = self.table.bucket(args.len()) else {
            let err = MatchError::arity_not_found(args);
            tracing::debug!(arity = args.len(), error = %err, "no async clause accepts this arity");
            return Err(err);
        };

        for (index, clause) in bucket {
            tracing::trace!(clause = *index, arity = args.len(), "trying async clause");
            let filled = clause.head.fill(args);
            let Some(bindings) = clause.head.bind(&filled) else {
                continue;
            };
            if let Some(guard) = &clause.guard {
                if !guard(bindings.clone()).await {
                    continue;
                }
            }
            return Ok((clause.body)(bindings).await);
        }

        let err = MatchError::no_match(args);
        tracing::debug!(arity = args.len(), error = %err, "no async clause matched");
        Err(err)
    }

    /// Call arities this dispatcher accepts, ascending.
    pub fn arities(&self) -> impl Iterator<Item = usize> + '_ {
        self.table.arities()
    }
}

impl<R> fmt::Debug for AsyncDispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncDispatcher")
            .field("clauses", &self.table.len())
            .finish()
    }
}
