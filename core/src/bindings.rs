//! `Bindings`: The ordered output of one match attempt
//!
//! Every matcher appends the values it binds, in depth-first left-to-right
//! order. Guards and clause bodies receive exactly this sequence.

use crate::Value;
use std::collections::HashMap;

/// Ordered values bound during a single match attempt.
///
/// Named variables are also indexed by name. Binding a name a second time
/// with a different value is a conflict: [`push_named`](Self::push_named)
/// returns `false` and the attempt fails on the spot.
///
/// # Example
///
/// ```
/// use clausal::{Bindings, Value};
///
/// let mut out = Bindings::new();
/// assert!(out.push_named("x", Value::from(1)));
/// assert!(out.push_named("x", Value::from(1)));
/// assert!(!out.push_named("x", Value::from(2)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: Vec<Value>,
    names: HashMap<String, usize>,
}

impl Bindings {
    /// Create an empty binding sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional binding.
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Append a binding under `name`.
    ///
    /// Returns `false` without appending if `name` is already bound to a
    /// different value.
    #[must_use]
    pub fn push_named(&mut self, name: &str, value: Value) -> bool {
        if let Some(&index) = self.names.get(name) {
            if self.values[index] != value {
                return false;
            }
        } else {
            self.names.insert(name.to_owned(), self.values.len());
        }
        self.values.push(value);
        true
    }

    /// Look up the value bound under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names.get(name).map(|&i| &self.values[i])
    }

    /// Number of bound values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The bound values in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Consume into the ordered values.
    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.values
    }
}
