//! Pattern compiler: `Pattern` tree → `Matcher` tree, once
//!
//! # Resolution order
//!
//! Each node resolves to exactly one matcher kind. Bare literals dispatch on
//! the literal's value: `Undefined` behaves as a wildcard, lists and maps of
//! literals match structurally, everything else matches by strict equality.
//! Object literals have no stable identity to compare against and are
//! rejected.

use crate::bitstring::BitStringMatcher;
use crate::matcher::{
    BoundMatcher, CaptureMatcher, HeadTailMatcher, ListMatcher, LiteralMatcher, MapMatcher,
    StartsWithMatcher, TypeMatcher, VariableMatcher, WildcardMatcher,
};
use crate::{Bindings, MatchError, Matcher, Pattern, PatternError, Value, MAX_DEPTH};
use std::collections::BTreeMap;

/// Compile a pattern into a reusable matcher.
///
/// # Errors
///
/// Returns [`PatternError`] for malformed bitstring segments, object literals,
/// and patterns nested deeper than [`MAX_DEPTH`].
///
/// # Example
///
/// ```
/// use clausal::{build_match, capture, list, variable, Value};
///
/// let compiled = build_match(&capture(list([1.into(), variable(), 3.into(), variable()]))).unwrap();
/// let value = Value::list([1, 2, 3, 4]);
/// assert_eq!(
///     compiled.bind(&value),
///     Some(vec![Value::from(2), Value::from(4), value.clone()])
/// );
/// ```
pub fn build_match(pattern: &Pattern) -> Result<CompiledPattern, PatternError> {
    let root = compile_node(pattern, 1)?;
    Ok(CompiledPattern { root })
}

fn check_depth(depth: usize) -> Result<(), PatternError> {
    if depth > MAX_DEPTH {
        return Err(PatternError::DepthExceeded {
            depth,
            max: MAX_DEPTH,
        });
    }
    Ok(())
}

fn compile_node(pattern: &Pattern, depth: usize) -> Result<Box<dyn Matcher>, PatternError> {
    check_depth(depth)?;
    let matcher: Box<dyn Matcher> = match pattern {
        Pattern::Variable(var) if var.is_ignored() => Box::new(WildcardMatcher),
        Pattern::Variable(var) => match var.binding_name() {
            Some(name) => Box::new(VariableMatcher::named(name)),
            None => Box::new(VariableMatcher::positional()),
        },
        Pattern::Wildcard => Box::new(WildcardMatcher),
        Pattern::HeadTail(head, tail) => Box::new(HeadTailMatcher::new(
            compile_node(head, depth + 1)?,
            compile_node(tail, depth + 1)?,
        )),
        Pattern::StartsWith(prefix) => Box::new(StartsWithMatcher::new(prefix.as_str())),
        Pattern::Capture(inner) => Box::new(CaptureMatcher::new(compile_node(inner, depth + 1)?)),
        Pattern::Bound(value) => Box::new(BoundMatcher::new(value.clone())),
        Pattern::Type(target) => Box::new(TypeMatcher::new(
            target.class,
            compile_fields(&target.fields, depth)?,
        )),
        Pattern::BitString(segments) => Box::new(BitStringMatcher::compile(segments)?),
        Pattern::List(items) => Box::new(ListMatcher::new(
            items
                .iter()
                .map(|item| compile_node(item, depth + 1))
                .collect::<Result<_, _>>()?,
        )),
        Pattern::Literal(value) => compile_literal(value, depth)?,
        Pattern::Map(fields) => Box::new(compile_fields(fields, depth)?),
    };
    Ok(matcher)
}

fn compile_fields(
    fields: &BTreeMap<String, Pattern>,
    depth: usize,
) -> Result<MapMatcher, PatternError> {
    let entries = fields
        .iter()
        .map(|(key, p)| Ok((key.clone(), compile_node(p, depth + 1)?)))
        .collect::<Result<BTreeMap<_, _>, PatternError>>()?;
    Ok(MapMatcher::new(entries))
}

fn compile_literal(value: &Value, depth: usize) -> Result<Box<dyn Matcher>, PatternError> {
    check_depth(depth)?;
    Ok(match value {
        Value::Undefined => Box::new(WildcardMatcher),
        Value::List(items) => Box::new(ListMatcher::new(
            items
                .iter()
                .map(|item| compile_literal(item, depth + 1))
                .collect::<Result<_, _>>()?,
        )),
        Value::Map(fields) => {
            let entries = fields
                .iter()
                .map(|(key, v)| Ok((key.clone(), compile_literal(v, depth + 1)?)))
                .collect::<Result<BTreeMap<_, _>, PatternError>>()?;
            Box::new(MapMatcher::new(entries))
        }
        Value::Object(_) => {
            return Err(PatternError::UnsupportedLiteral {
                value_type: value.type_name(),
            })
        }
        scalar => Box::new(LiteralMatcher::new(scalar.clone())),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// CompiledPattern
// ═══════════════════════════════════════════════════════════════════════════════

/// A compiled pattern, ready to match many values.
///
/// Immutable and `Send + Sync`: compile once, share freely.
#[derive(Debug)]
pub struct CompiledPattern {
    root: Box<dyn Matcher>,
}

impl CompiledPattern {
    /// Match `value`, appending bindings to `out`.
    pub fn attempt(&self, value: &Value, out: &mut Bindings) -> bool {
        self.root.attempt(value, out)
    }

    /// Returns `true` if `value` matches.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        self.root.attempt(value, &mut Bindings::new())
    }

    /// Match `value` and return its bindings, or `None` on mismatch.
    #[must_use]
    pub fn bind(&self, value: &Value) -> Option<Vec<Value>> {
        let mut out = Bindings::new();
        self.root.attempt(value, &mut out).then(|| out.into_vec())
    }

    /// Number of values a successful match binds.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.root.binding_count()
    }

    /// Match `value` and run `guard` over the bindings.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if `value` does not match or the guard rejects it.
    pub fn match_value<G>(&self, value: &Value, guard: G) -> Result<Vec<Value>, MatchError>
    where
        G: Fn(&[Value]) -> bool,
    {
        self.match_no_throw(value, guard)
            .ok_or_else(|| MatchError::no_match(std::slice::from_ref(value)))
    }

    /// Like [`match_value`](Self::match_value), returning `default` instead of an error.
    pub fn match_or_default<G>(&self, value: &Value, guard: G, default: Vec<Value>) -> Vec<Value>
    where
        G: Fn(&[Value]) -> bool,
    {
        self.match_no_throw(value, guard).unwrap_or(default)
    }

    /// Like [`match_value`](Self::match_value), returning `None` instead of an error.
    pub fn match_no_throw<G>(&self, value: &Value, guard: G) -> Option<Vec<Value>>
    where
        G: Fn(&[Value]) -> bool,
    {
        self.bind(value).filter(|bindings| guard(bindings))
    }
}
