//! `Clause`: One overload of a dispatcher: parameter patterns, guard, body
//!
//! A clause with `K` trailing defaulted parameters accepts every call arity in
//! `[arity - K, arity]`. Missing arguments are filled from the defaults before
//! matching, on a private copy of the arguments.

use crate::{build_match, Bindings, CompiledPattern, Pattern, PatternError, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

pub(crate) type Guard = Arc<dyn Fn(&[Value]) -> bool + Send + Sync>;
pub(crate) type Body<R> = Arc<dyn Fn(&[Value]) -> R + Send + Sync>;

/// The part of a clause shared by every dispatcher flavor: parameter
/// patterns plus the defaults used to fill short calls.
#[derive(Debug)]
pub(crate) struct ClauseHead {
    params: Vec<CompiledPattern>,
    optionals: Vec<(usize, Value)>,
}

impl ClauseHead {
    pub(crate) fn new<I, P>(params: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Pattern>,
    {
        let params: Vec<Pattern> = params.into_iter().map(Into::into).collect();
        let optionals = params
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_defaulted().map(|d| (i, d.clone())))
            .collect();
        let params = params
            .iter()
            .map(build_match)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { params, optionals })
    }

    /// Number of declared parameters.
    pub(crate) fn arity(&self) -> usize {
        self.params.len()
    }

    /// Lowest call arity this clause accepts.
    pub(crate) fn min_arity(&self) -> usize {
        self.arity() - self.optionals.len()
    }

    /// Splice defaults into a short argument list.
    ///
    /// Uses the last `arity - args.len()` defaults, each inserted at its
    /// declared position (clamped to the current length) in ascending order.
    pub(crate) fn fill<'a>(&self, args: &'a [Value]) -> Cow<'a, [Value]> {
        let arity = self.arity();
        if args.len() >= arity || args.len() + self.optionals.len() < arity {
            return Cow::Borrowed(args);
        }
        let missing = arity - args.len();
        let mut filled = args.to_vec();
        for (index, default) in &self.optionals[self.optionals.len() - missing..] {
            let at = (*index).min(filled.len());
            filled.insert(at, default.clone());
        }
        Cow::Owned(filled)
    }

    /// Match already-filled arguments against the parameters, left to right,
    /// sharing one binding sequence so names reconcile across parameters.
    pub(crate) fn bind(&self, args: &[Value]) -> Option<Vec<Value>> {
        if args.len() != self.params.len() {
            return None;
        }
        let mut out = Bindings::new();
        self.params
            .iter()
            .zip(args)
            .all(|(param, arg)| param.attempt(arg, &mut out))
            .then(|| out.into_vec())
    }
}

/// A parameter list, a guard and a body.
///
/// Build with [`clause`], optionally add a guard with [`Clause::when`], then
/// hand to [`defmatch`](crate::defmatch).
pub struct Clause<R> {
    pub(crate) head: ClauseHead,
    pub(crate) guard: Guard,
    pub(crate) body: Body<R>,
}

/// Build a clause from parameter patterns and a body.
///
/// The body receives the bindings of all parameters in order.
///
/// # Errors
///
/// Returns [`PatternError`] if any parameter pattern is malformed.
///
/// # Example
///
/// ```
/// use clausal::{clause, defaulted, variable, Value};
///
/// let c = clause([variable(), defaulted("step", 1)], |args| args.len()).unwrap();
/// assert_eq!(c.arity(), 2);
/// assert_eq!(c.min_arity(), 1);
/// ```
pub fn clause<R, I, P, F>(params: I, body: F) -> Result<Clause<R>, PatternError>
where
    I: IntoIterator<Item = P>,
    P: Into<Pattern>,
    F: Fn(&[Value]) -> R + Send + Sync + 'static,
{
    Ok(Clause {
        head: ClauseHead::new(params)?,
        guard: Arc::new(crate::always),
        body: Arc::new(body),
    })
}

impl<R> Clause<R> {
    /// Only select this clause when `guard` accepts the bindings.
    ///
    /// A panicking guard aborts the whole dispatch.
    #[must_use]
    pub fn when<G>(mut self, guard: G) -> Self
    where
        G: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        self.guard = Arc::new(guard);
        self
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.head.arity()
    }

    /// Lowest call arity accepted, counting trailing defaults.
    #[must_use]
    pub fn min_arity(&self) -> usize {
        self.head.min_arity()
    }

    /// Fill, match and guard `args`, returning the bindings on success.
    pub(crate) fn select(&self, args: &[Value]) -> Option<Vec<Value>> {
        let filled = self.head.fill(args);
        self.head
            .bind(&filled)
            .filter(|bindings| (self.guard)(bindings))
    }
}

impl<R> fmt::Debug for Clause<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clause")
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}
