//! `Pattern`: The closed set of pattern kinds and their constructors
//!
//! A pattern is plain data: building one performs no validation. Compile it
//! with [`build_match`](crate::build_match) to get an executable matcher.
//!
//! # Constructors
//!
//! | Function | Pattern | Binds |
//! |----------|---------|-------|
//! | [`wildcard()`] | `_` | nothing |
//! | [`variable()`] / [`named()`] | `x` | the value |
//! | [`defaulted()`] | `x \\ default` | the value |
//! | [`capture()`] | `p = x` | inner bindings, then the value |
//! | [`starts_with()`] | `"prefix" <> rest` | the suffix |
//! | [`head_tail()`] / [`head_tail_of()`] | `[h \| t]` | head, then tail |
//! | [`bound()`] | `^x` | nothing |
//! | [`type_of()`] / [`type_with()`] | `%Struct{..}` | field bindings |
//! | [`bitstring()`] | `<<..>>` | one value per free segment |
//! | [`literal()`], [`list()`], [`map()`] | literals and containers | element bindings |

use crate::bitstring::Segment;
use crate::{Atom, Class, Value};
use std::collections::BTreeMap;

/// Variables named with this prefix match anything and bind nothing.
pub const IGNORE_MARKER: char = '_';

/// A pattern node.
///
/// Every kind is handled by the compiler; there is no open extension point.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Matches anything, binds nothing.
    Wildcard,

    /// Matches anything, binds the value.
    Variable(Variable),

    /// Matches if the inner pattern matches, then also binds the whole value.
    Capture(Box<Pattern>),

    /// Matches strings with the prefix, binds the remainder.
    StartsWith(String),

    /// Matches non-empty lists: head against the first element, tail against the rest.
    HeadTail(Box<Pattern>, Box<Pattern>),

    /// Matches only a strictly equal value. Binds nothing.
    Bound(Value),

    /// Matches object instances of a class whose fields match.
    Type(TypePattern),

    /// Matches binary data segment by segment.
    BitString(Vec<Segment>),

    /// A bare literal.
    ///
    /// Scalars match by strict equality, `Undefined` matches anything, lists and
    /// maps of literals match structurally.
    Literal(Value),

    /// Matches a list of the same length, element-wise.
    List(Vec<Pattern>),

    /// Matches a map (or object) containing at least these keys.
    Map(BTreeMap<String, Pattern>),
}

/// A binding site, optionally named and optionally carrying a default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variable {
    name: Option<String>,
    default: Option<Value>,
}

impl Variable {
    /// An unnamed variable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A named variable.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            default: None,
        }
    }

    /// Attach a default used when a clause is called without this argument.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The declared name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name used for reconciliation: `None` for unnamed and ignore-marked variables.
    #[must_use]
    pub fn binding_name(&self) -> Option<&str> {
        self.name().filter(|n| !n.starts_with(IGNORE_MARKER))
    }

    /// Whether the name carries [`IGNORE_MARKER`]; such a variable binds nothing.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.name().is_some_and(|n| n.starts_with(IGNORE_MARKER))
    }

    /// The default value, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Target of a `Type` pattern: a class plus a field pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct TypePattern {
    /// Class the value must be an instance of.
    pub class: Class,
    /// Patterns for the instance's fields (extra fields are ignored).
    pub fields: BTreeMap<String, Pattern>,
}

impl Pattern {
    /// Returns the variable if this pattern is a variable carrying a default.
    #[must_use]
    pub fn as_defaulted(&self) -> Option<&Value> {
        match self {
            Self::Variable(v) => v.default_value(),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constructors
// ═══════════════════════════════════════════════════════════════════════════════

/// `_`: matches anything, binds nothing.
#[must_use]
pub fn wildcard() -> Pattern {
    Pattern::Wildcard
}

/// An unnamed variable: matches anything and binds it.
#[must_use]
pub fn variable() -> Pattern {
    Pattern::Variable(Variable::new())
}

/// A named variable. Repeated names in one pattern must bind equal values.
pub fn named(name: impl Into<String>) -> Pattern {
    Pattern::Variable(Variable::named(name))
}

/// A named variable with a default, for optional trailing clause parameters.
pub fn defaulted(name: impl Into<String>, default: impl Into<Value>) -> Pattern {
    Pattern::Variable(Variable::named(name).with_default(default))
}

/// Binds everything `inner` binds, then the whole value.
pub fn capture(inner: impl Into<Pattern>) -> Pattern {
    Pattern::Capture(Box::new(inner.into()))
}

/// Matches strings beginning with `prefix`, binding the rest.
pub fn starts_with(prefix: impl Into<String>) -> Pattern {
    Pattern::StartsWith(prefix.into())
}

/// `[h | t]` with both sides unnamed variables.
#[must_use]
pub fn head_tail() -> Pattern {
    head_tail_of(variable(), variable())
}

/// `[head | tail]` with explicit sub-patterns.
pub fn head_tail_of(head: impl Into<Pattern>, tail: impl Into<Pattern>) -> Pattern {
    Pattern::HeadTail(Box::new(head.into()), Box::new(tail.into()))
}

/// `^value`: asserts strict equality, binds nothing.
pub fn bound(value: impl Into<Value>) -> Pattern {
    Pattern::Bound(value.into())
}

/// Matches any instance of `class`.
#[must_use]
pub fn type_of(class: Class) -> Pattern {
    Pattern::Type(TypePattern {
        class,
        fields: BTreeMap::new(),
    })
}

/// Matches instances of `class` whose fields match `fields`.
pub fn type_with<I, K, P>(class: Class, fields: I) -> Pattern
where
    I: IntoIterator<Item = (K, P)>,
    K: Into<String>,
    P: Into<Pattern>,
{
    Pattern::Type(TypePattern {
        class,
        fields: collect_entries(fields),
    })
}

/// A binary pattern built from segments.
#[must_use]
pub fn bitstring(segments: Vec<Segment>) -> Pattern {
    Pattern::BitString(segments)
}

/// A bare literal.
pub fn literal(value: impl Into<Value>) -> Pattern {
    Pattern::Literal(value.into())
}

/// A same-length list pattern.
pub fn list<I, P>(items: I) -> Pattern
where
    I: IntoIterator<Item = P>,
    P: Into<Pattern>,
{
    Pattern::List(items.into_iter().map(Into::into).collect())
}

/// A map pattern requiring at least the given keys.
pub fn map<I, K, P>(entries: I) -> Pattern
where
    I: IntoIterator<Item = (K, P)>,
    K: Into<String>,
    P: Into<Pattern>,
{
    Pattern::Map(collect_entries(entries))
}

fn collect_entries<I, K, P>(entries: I) -> BTreeMap<String, Pattern>
where
    I: IntoIterator<Item = (K, P)>,
    K: Into<String>,
    P: Into<Pattern>,
{
    entries
        .into_iter()
        .map(|(k, p)| (k.into(), p.into()))
        .collect()
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<bool> for Pattern {
    fn from(b: bool) -> Self {
        Self::Literal(Value::Bool(b))
    }
}

impl From<i32> for Pattern {
    fn from(i: i32) -> Self {
        Self::Literal(Value::from(i))
    }
}

impl From<i64> for Pattern {
    fn from(i: i64) -> Self {
        Self::Literal(Value::Int(i))
    }
}

impl From<f64> for Pattern {
    fn from(x: f64) -> Self {
        Self::Literal(Value::Float(x))
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Self::Literal(Value::from(s))
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Self::Literal(Value::String(s))
    }
}

impl From<Atom> for Pattern {
    fn from(a: Atom) -> Self {
        Self::Literal(Value::Atom(a))
    }
}

impl From<Vec<Pattern>> for Pattern {
    fn from(items: Vec<Pattern>) -> Self {
        Self::List(items)
    }
}
