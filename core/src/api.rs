//! Single-shot matching: compile, match once, guard

use crate::{build_match, Error, Pattern, PatternError, Value};
use std::future::Future;

/// The default guard: accepts every binding list.
#[must_use]
pub fn always(_bindings: &[Value]) -> bool {
    true
}

/// Match `value` against `pattern` and return the bindings.
///
/// # Errors
///
/// - [`Error::Pattern`] if the pattern is malformed
/// - [`Error::Match`] if the value does not match or `guard` rejects the bindings
///
/// # Example
///
/// ```
/// use clausal::{match_pattern, starts_with, always, Error, Value};
///
/// let bound = match_pattern(&starts_with("Bearer "), &Value::from("Bearer 1234"), always).unwrap();
/// assert_eq!(bound, vec![Value::from("1234")]);
///
/// let err = match_pattern(&starts_with("Bearer "), &Value::from("Token 1234"), always);
/// assert!(matches!(err, Err(Error::Match(_))));
/// ```
pub fn match_pattern<G>(pattern: &Pattern, value: &Value, guard: G) -> Result<Vec<Value>, Error>
where
    G: Fn(&[Value]) -> bool,
{
    Ok(build_match(pattern)?.match_value(value, guard)?)
}

/// Like [`match_pattern`], returning `default` on mismatch.
///
/// # Errors
///
/// Returns [`PatternError`] if the pattern is malformed.
pub fn match_or_default<G>(
    pattern: &Pattern,
    value: &Value,
    guard: G,
    default: Vec<Value>,
) -> Result<Vec<Value>, PatternError>
where
    G: Fn(&[Value]) -> bool,
{
    Ok(build_match(pattern)?.match_or_default(value, guard, default))
}

/// Like [`match_pattern`], returning `None` on mismatch.
///
/// Only [`MatchError`](crate::MatchError) becomes `None`; malformed patterns still fail.
///
/// # Errors
///
/// Returns [`PatternError`] if the pattern is malformed.
pub fn match_no_throw<G>(
    pattern: &Pattern,
    value: &Value,
    guard: G,
) -> Result<Option<Vec<Value>>, PatternError>
where
    G: Fn(&[Value]) -> bool,
{
    match match_pattern(pattern, value, guard) {
        Ok(bindings) => Ok(Some(bindings)),
        Err(Error::Match(_)) => Ok(None),
        Err(Error::Pattern(e)) => Err(e),
    }
}

/// [`match_or_default`] with an asynchronous guard.
///
/// The guard receives its own copy of the bindings.
///
/// # Errors
///
/// Returns [`PatternError`] if the pattern is malformed.
pub async fn match_or_default_async<G, Fut>(
    pattern: &Pattern,
    value: &Value,
    guard: G,
    default: Vec<Value>,
) -> Result<Vec<Value>, PatternError>
where
    G: FnOnce(Vec<Value>) -> Fut,
    Fut: Future<Output = bool>,
{
    let compiled = build_match(pattern)?;
    let Some(bindings) = compiled.bind(value) else {
        return Ok(default);
    };
    if guard(bindings.clone()).await {
        Ok(bindings)
    } else {
        Ok(default)
    }
}
