//! `Matcher`: Compiled, reusable matchers for each pattern kind
//!
//! The compiler turns a [`Pattern`](crate::Pattern) tree into a tree of boxed
//! matchers exactly once. Matching afterwards never re-walks the pattern.
//!
//! # Binding contract
//!
//! Each matcher appends a fixed number of values to the output on success,
//! reported by [`Matcher::binding_count`]. Composite matchers append their
//! children's bindings in left-to-right order.
//!
//! | Matcher | Appends |
//! |---------|---------|
//! | [`WildcardMatcher`], [`LiteralMatcher`], [`BoundMatcher`] | 0 |
//! | [`VariableMatcher`], [`StartsWithMatcher`] | 1 |
//! | [`CaptureMatcher`] | inner, then 1 |
//! | [`HeadTailMatcher`] | head, then tail |
//! | [`ListMatcher`], [`MapMatcher`], [`TypeMatcher`] | sum of children |

use crate::{Bindings, Class, Value};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Matches a [`Value`], appending bindings on success.
///
/// On failure the output may hold partial bindings; callers discard it.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so one compiled pattern can serve
/// concurrent callers.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Matcher`",
    label = "this type cannot match against Value",
    note = "patterns are compiled with `build_match`; the pattern kinds are a closed set"
)]
pub trait Matcher: Send + Sync + Debug {
    /// Attempt to match `value`, appending bindings to `out`.
    fn attempt(&self, value: &Value, out: &mut Bindings) -> bool;

    /// Number of values appended on success.
    fn binding_count(&self) -> usize;
}

#[diagnostic::do_not_recommend]
impl Matcher for Box<dyn Matcher> {
    fn attempt(&self, value: &Value, out: &mut Bindings) -> bool {
        (**self).attempt(value, out)
    }

    fn binding_count(&self) -> usize {
        (**self).binding_count()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Leaf matchers
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches anything and binds nothing.
///
/// # Example
///
/// ```
/// use clausal::{Bindings, Matcher, Value, WildcardMatcher};
///
/// let mut out = Bindings::new();
/// assert!(WildcardMatcher.attempt(&Value::Undefined, &mut out));
/// assert!(out.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WildcardMatcher;

impl Matcher for WildcardMatcher {
    fn attempt(&self, _value: &Value, _out: &mut Bindings) -> bool {
        true
    }

    fn binding_count(&self) -> usize {
        0
    }
}

/// Matches anything and binds it, positionally or under a name.
#[derive(Debug, Clone, Default)]
pub struct VariableMatcher {
    name: Option<String>,
}

impl VariableMatcher {
    /// A variable that binds positionally.
    #[must_use]
    pub fn positional() -> Self {
        Self { name: None }
    }

    /// A variable reconciled by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl Matcher for VariableMatcher {
    fn attempt(&self, value: &Value, out: &mut Bindings) -> bool {
        match &self.name {
            Some(name) => out.push_named(name, value.clone()),
            None => {
                out.push(value.clone());
                true
            }
        }
    }

    fn binding_count(&self) -> usize {
        1
    }
}

/// Matches a strictly equal literal.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    expected: Value,
}

impl LiteralMatcher {
    /// Create a literal matcher.
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl Matcher for LiteralMatcher {
    fn attempt(&self, value: &Value, _out: &mut Bindings) -> bool {
        *value == self.expected
    }

    fn binding_count(&self) -> usize {
        0
    }
}

/// `^value`: asserts strict equality with an already-bound value.
///
/// Identical acceptance to [`LiteralMatcher`]; kept distinct so traces and
/// debug output show which form the user wrote.
#[derive(Debug, Clone)]
pub struct BoundMatcher {
    expected: Value,
}

impl BoundMatcher {
    /// Create a bound-value matcher.
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl Matcher for BoundMatcher {
    fn attempt(&self, value: &Value, _out: &mut Bindings) -> bool {
        *value == self.expected
    }

    fn binding_count(&self) -> usize {
        0
    }
}

/// Matches strings starting with a prefix and binds the suffix.
///
/// # Example
///
/// ```
/// use clausal::{Bindings, Matcher, StartsWithMatcher, Value};
///
/// let matcher = StartsWithMatcher::new("Bearer ");
/// let mut out = Bindings::new();
/// assert!(matcher.attempt(&"Bearer 1234".into(), &mut out));
/// assert_eq!(out.as_slice(), &[Value::from("1234")]);
/// assert!(!matcher.attempt(&"Token 1234".into(), &mut Bindings::new()));
/// ```
#[derive(Debug, Clone)]
pub struct StartsWithMatcher {
    prefix: String,
}

impl StartsWithMatcher {
    /// Create a prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the prefix being matched.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Matcher for StartsWithMatcher {
    fn attempt(&self, value: &Value, out: &mut Bindings) -> bool {
        let Some(rest) = value.as_str().and_then(|s| s.strip_prefix(&self.prefix)) else {
            return false;
        };
        out.push(Value::String(rest.to_owned()));
        true
    }

    fn binding_count(&self) -> usize {
        1
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Composite matchers
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches `inner`, then binds the whole value after `inner`'s bindings.
#[derive(Debug)]
pub struct CaptureMatcher {
    inner: Box<dyn Matcher>,
}

impl CaptureMatcher {
    /// Wrap a compiled inner matcher.
    #[must_use]
    pub fn new(inner: Box<dyn Matcher>) -> Self {
        Self { inner }
    }
}

impl Matcher for CaptureMatcher {
    fn attempt(&self, value: &Value, out: &mut Bindings) -> bool {
        if !self.inner.attempt(value, out) {
            return false;
        }
        out.push(value.clone());
        true
    }

    fn binding_count(&self) -> usize {
        self.inner.binding_count() + 1
    }
}

/// `[head | tail]` over non-empty lists.
#[derive(Debug)]
pub struct HeadTailMatcher {
    head: Box<dyn Matcher>,
    tail: Box<dyn Matcher>,
}

impl HeadTailMatcher {
    /// Combine compiled head and tail matchers.
    #[must_use]
    pub fn new(head: Box<dyn Matcher>, tail: Box<dyn Matcher>) -> Self {
        Self { head, tail }
    }
}

impl Matcher for HeadTailMatcher {
    fn attempt(&self, value: &Value, out: &mut Bindings) -> bool {
        let Some((first, rest)) = value.as_list().and_then(<[Value]>::split_first) else {
            return false;
        };
        self.head.attempt(first, out) && self.tail.attempt(&Value::List(rest.to_vec()), out)
    }

    fn binding_count(&self) -> usize {
        self.head.binding_count() + self.tail.binding_count()
    }
}

/// Matches a list of exactly the same length, element-wise.
#[derive(Debug)]
pub struct ListMatcher {
    items: Vec<Box<dyn Matcher>>,
}

impl ListMatcher {
    /// Combine compiled element matchers.
    #[must_use]
    pub fn new(items: Vec<Box<dyn Matcher>>) -> Self {
        Self { items }
    }

    /// Number of elements the list must have.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if this matches only the empty list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Matcher for ListMatcher {
    fn attempt(&self, value: &Value, out: &mut Bindings) -> bool {
        let Some(candidates) = value.as_list() else {
            return false;
        };
        candidates.len() == self.items.len()
            && self
                .items
                .iter()
                .zip(candidates)
                .all(|(matcher, candidate)| matcher.attempt(candidate, out))
    }

    fn binding_count(&self) -> usize {
        self.items.iter().map(|m| m.binding_count()).sum()
    }
}

/// Matches maps or object instances holding at least the pattern's keys.
///
/// Keys are visited in sorted order, which fixes the binding order.
#[derive(Debug, Default)]
pub struct MapMatcher {
    entries: Vec<(String, Box<dyn Matcher>)>,
}

impl MapMatcher {
    /// Combine compiled per-key matchers.
    #[must_use]
    pub fn new(entries: BTreeMap<String, Box<dyn Matcher>>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Match against a field map directly.
    pub(crate) fn attempt_fields(
        &self,
        fields: &BTreeMap<String, Value>,
        out: &mut Bindings,
    ) -> bool {
        self.entries.len() <= fields.len()
            && self.entries.iter().all(|(key, matcher)| {
                fields
                    .get(key)
                    .is_some_and(|field| matcher.attempt(field, out))
            })
    }
}

impl Matcher for MapMatcher {
    fn attempt(&self, value: &Value, out: &mut Bindings) -> bool {
        match value {
            Value::Map(fields) => self.attempt_fields(fields, out),
            Value::Object(instance) => self.attempt_fields(&instance.fields(), out),
            _ => false,
        }
    }

    fn binding_count(&self) -> usize {
        self.entries.iter().map(|(_, m)| m.binding_count()).sum()
    }
}

/// Matches instances of a class whose fields match a map pattern.
#[derive(Debug)]
pub struct TypeMatcher {
    class: Class,
    fields: MapMatcher,
}

impl TypeMatcher {
    /// Create a type matcher.
    #[must_use]
    pub fn new(class: Class, fields: MapMatcher) -> Self {
        Self { class, fields }
    }
}

impl Matcher for TypeMatcher {
    fn attempt(&self, value: &Value, out: &mut Bindings) -> bool {
        let Some(instance) = value.as_object() else {
            return false;
        };
        self.class.is_instance(instance) && self.fields.attempt_fields(&instance.fields(), out)
    }

    fn binding_count(&self) -> usize {
        self.fields.binding_count()
    }
}
