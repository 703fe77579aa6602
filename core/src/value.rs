//! `Value`: The dynamic data that patterns are matched against
//!
//! Patterns never see host types directly. Everything a matcher inspects is a
//! [`Value`]: scalars, lists, string-keyed maps, raw bytes, and opaque object
//! instances.
//!
//! # Extensibility via `Object`
//!
//! For user-defined record types, implement [`Instance`] and wrap in
//! `Value::Object(Arc::new(your_type))`. [`Class`] identifies the concrete type
//! so that `Type` patterns can perform an `instanceof`-style check.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

/// Extension trait for object instances carried inside a [`Value`].
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so compiled matchers and values can
/// be shared across threads.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
/// use clausal::{Class, Instance, Value};
///
/// #[derive(Debug)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Instance for Point {
///     fn class_name(&self) -> &'static str {
///         "Point"
///     }
///
///     fn fields(&self) -> BTreeMap<String, Value> {
///         BTreeMap::from([("x".into(), self.x.into()), ("y".into(), self.y.into())])
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let value = Value::Object(Arc::new(Point { x: 1, y: 2 }));
/// assert!(Class::of::<Point>().is_instance(value.as_object().unwrap()));
/// assert_eq!(value.type_name(), "Point");
/// ```
pub trait Instance: Send + Sync + Debug {
    /// Human-readable class name, used in messages and `type_name()`.
    fn class_name(&self) -> &'static str;

    /// The instance's own fields, visible to map and `Type` patterns.
    fn fields(&self) -> BTreeMap<String, Value>;

    /// Returns `self` as `&dyn Any` for type identification and downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Identifies a concrete [`Instance`] type.
///
/// This is the constructor half of an `instanceof` check: a value is an
/// instance of a class when its concrete Rust type is the class's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Class {
    id: TypeId,
    name: &'static str,
}

impl Class {
    /// The class of the concrete type `T`.
    #[must_use]
    pub fn of<T: Instance + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified Rust type name of the class.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if `instance` is of exactly this class.
    #[must_use]
    pub fn is_instance(&self, instance: &dyn Instance) -> bool {
        Any::type_id(instance.as_any()) == self.id
    }
}

/// A named symbolic constant, Elixir's `:ok` / `:error`.
///
/// Atoms compare by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(Arc<str>);

impl Atom {
    /// Create an atom with the given name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The atom's name, without the leading colon.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

/// A dynamically typed value.
///
/// # Variants
///
/// - `Undefined`: absent value (also acts as a wildcard when used as a literal pattern)
/// - `Null`: explicit null
/// - `Bool`, `Int`, `Float`, `String`: scalars
/// - `Atom`: symbolic constant
/// - `Bytes`: binary data, the subject of bitstring patterns
/// - `List`: ordered sequence
/// - `Map`: string-keyed map
/// - `Object`: user-defined instance implementing [`Instance`]
///
/// # Equality
///
/// Equality is strict: the variant and the value must both agree, so
/// `Int(1) != Float(1.0)`. Lists, maps and bytes compare structurally, objects by
/// `Arc` identity.
///
/// # Example
///
/// ```
/// use clausal::Value;
///
/// let v = Value::list([1, 2, 3]);
/// assert_eq!(v.as_list().map(<[Value]>::len), Some(3));
/// assert_eq!(v.to_string(), "1,2,3");
/// assert_ne!(Value::from(1), Value::from(1.0));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value.
    #[default]
    Undefined,

    /// Explicit null.
    Null,

    /// Boolean.
    Bool(bool),

    /// Integer.
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// UTF-8 string.
    String(String),

    /// Symbolic constant.
    Atom(Atom),

    /// Raw bytes.
    Bytes(Vec<u8>),

    /// Ordered sequence of values.
    List(Vec<Value>),

    /// String-keyed map.
    Map(BTreeMap<String, Value>),

    /// User-defined object instance.
    Object(Arc<dyn Instance>),
}

// Manual PartialEq implementation because trait objects don't auto-derive it.
// For Object variants, we use Arc pointer equality (same allocation = equal).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Atom(a), Self::Atom(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Build a list from anything convertible into values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a map from key/value pairs.
    pub fn map<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an atom value.
    pub fn atom(name: impl AsRef<str>) -> Self {
        Self::Atom(Atom::new(name))
    }

    /// Wrap an [`Instance`] as an object value.
    pub fn object(instance: impl Instance + 'static) -> Self {
        Self::Object(Arc::new(instance))
    }

    /// Returns `true` if this is the `Undefined` variant.
    #[inline]
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` if this is the `Null` variant.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as a float.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as an atom.
    #[inline]
    #[must_use]
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Self::Atom(a) => Some(a),
            _ => None,
        }
    }

    /// Try to get the value as a byte slice.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Try to get the value as a list slice.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Try to get the value as a map.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get the value as an object instance.
    ///
    /// Use [`Instance::as_any`] to downcast to the concrete type.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&dyn Instance> {
        match self {
            Self::Object(o) => Some(o.as_ref()),
            _ => None,
        }
    }

    /// Returns a string describing the type of this value.
    ///
    /// For `Object` variants, this delegates to [`Instance::class_name`].
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Atom(_) => "atom",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(o) => o.class_name(),
        }
    }
}

/// Textual form used in match error messages.
///
/// Lists render like an array coerced to a string: elements joined by `,`.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Atom(a) => write!(f, "{a}"),
            Self::Bytes(bytes) => {
                f.write_str("<<")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{b}")?;
                }
                f.write_str(">>")
            }
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Map(entries) => write_entries(f, "", entries),
            Self::Object(o) => write_entries(f, o.class_name(), &o.fields()),
        }
    }
}

fn write_entries(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    entries: &BTreeMap<String, Value>,
) -> fmt::Result {
    write!(f, "{prefix}{{")?;
    for (i, (k, v)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{k}: {v}")?;
    }
    f.write_str("}")
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Atom> for Value {
    fn from(a: Atom) -> Self {
        Self::Atom(a)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Self::Map(m)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Undefined,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON interop (feature = "config")
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "config")]
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Undefined, Self::Float),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => {
                Self::Map(entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

#[cfg(feature = "config")]
impl Value {
    /// Render this value as JSON.
    ///
    /// Atoms become `":name"` strings, bytes become arrays of numbers, objects
    /// become their field maps. Non-finite floats and `Undefined` become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(x) => serde_json::Number::from_f64(*x)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Atom(a) => serde_json::Value::String(a.to_string()),
            Self::Bytes(b) => serde_json::Value::Array(
                b.iter().map(|byte| serde_json::Value::from(*byte)).collect(),
            ),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => serde_json::Value::Object(
                entries.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Self::Object(o) => serde_json::Value::Object(
                o.fields().iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point {
        x: i64,
        y: i64,
    }

    impl Instance for Point {
        fn class_name(&self) -> &'static str {
            "Point"
        }

        fn fields(&self) -> BTreeMap<String, Value> {
            BTreeMap::from([("x".into(), self.x.into()), ("y".into(), self.y.into())])
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Other;

    impl Instance for Other {
        fn class_name(&self) -> &'static str {
            "Other"
        }

        fn fields(&self) -> BTreeMap<String, Value> {
            BTreeMap::new()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_strict_equality() {
        assert_eq!(Value::from(1), Value::Int(1));
        assert_ne!(Value::from(1), Value::from(1.0));
        assert_ne!(Value::from("1"), Value::from(1));
        assert_ne!(Value::Null, Value::Undefined);
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn test_structural_list_and_map_equality() {
        assert_eq!(Value::list([1, 2]), Value::list([1, 2]));
        assert_ne!(Value::list([1, 2]), Value::list([2, 1]));
        assert_eq!(Value::map([("a", 1)]), Value::map([("a", 1)]));
    }

    #[test]
    fn test_object_equality_is_identity() {
        let shared: Arc<dyn Instance> = Arc::new(Point { x: 1, y: 2 });
        let a = Value::Object(Arc::clone(&shared));
        let b = Value::Object(shared);
        let c = Value::object(Point { x: 1, y: 2 });
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_class_instance_check() {
        let point = Value::object(Point { x: 0, y: 0 });
        let other = Value::object(Other);
        let class = Class::of::<Point>();
        assert!(class.is_instance(point.as_object().unwrap()));
        assert!(!class.is_instance(other.as_object().unwrap()));
        assert!(class.name().ends_with("Point"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(1).to_string(), "1");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::atom("ok").to_string(), ":ok");
        assert_eq!(Value::list([1, 2, 3]).to_string(), "1,2,3");
        assert_eq!(Value::from(vec![1u8, 2]).to_string(), "<<1, 2>>");
        assert_eq!(Value::map([("a", 1), ("b", 2)]).to_string(), "{a: 1, b: 2}");
        assert_eq!(
            Value::object(Point { x: 1, y: 2 }).to_string(),
            "Point{x: 1, y: 2}"
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Undefined.type_name(), "undefined");
        assert_eq!(Value::from(true).type_name(), "bool");
        assert_eq!(Value::atom("a").type_name(), "atom");
        assert_eq!(Value::object(Other).type_name(), "Other");
    }

    #[test]
    fn test_from_option() {
        assert!(Value::from(None::<i64>).is_undefined());
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_value_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Value>();
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_json_round_trip_shapes() {
        let json = serde_json::json!({"n": 1, "f": 1.5, "s": "x", "l": [true, null]});
        let value = Value::from(json.clone());
        let map = value.as_map().unwrap();
        assert_eq!(map["n"], Value::Int(1));
        assert_eq!(map["f"], Value::Float(1.5));
        assert_eq!(value.to_json(), json);
    }
}
