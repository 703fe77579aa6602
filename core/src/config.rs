//! Config types for declarative pattern construction.
//!
//! These types mirror [`Pattern`] and [`Segment`] but are serde-deserializable,
//! so patterns can be loaded from JSON or YAML and converted with
//! [`PatternConfig::into_pattern()`].
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type |
//! |-------------|-------------|
//! | [`PatternConfig`] | [`Pattern`] |
//! | [`SegmentConfig`] | [`Segment`] |
//!
//! Values inside configs are plain JSON and convert through
//! `From<serde_json::Value> for Value`: integers become `Int`, other numbers
//! `Float`, objects `Map`.

use crate::{Attribute, Pattern, Segment, SegmentType, SegmentValue, Value, Variable};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Configuration for a [`Pattern`].
///
/// Uses `#[serde(tag = "type")]` for discriminated union deserialization:
///
/// ```json
/// { "type": "list", "items": [
///     { "type": "variable" },
///     { "type": "literal", "value": 2 },
///     { "type": "wildcard" }
/// ] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternConfig {
    /// Matches anything, binds nothing.
    Wildcard,

    /// Matches anything and binds it.
    Variable {
        /// Name for reconciliation; omit for a positional binding.
        #[serde(default)]
        name: Option<String>,
        /// Default used when a clause is called without this argument.
        #[serde(default)]
        default: Option<serde_json::Value>,
    },

    /// Binds the inner pattern's bindings, then the whole value.
    Capture {
        /// The inner pattern.
        pattern: Box<PatternConfig>,
    },

    /// Matches strings with this prefix, binds the rest.
    StartsWith {
        /// Required prefix.
        prefix: String,
    },

    /// Matches a non-empty list as head and tail.
    HeadTail {
        /// Head pattern; defaults to a variable.
        #[serde(default)]
        head: Option<Box<PatternConfig>>,
        /// Tail pattern; defaults to a variable.
        #[serde(default)]
        tail: Option<Box<PatternConfig>>,
    },

    /// Asserts strict equality without binding.
    Bound {
        /// Expected value.
        value: serde_json::Value,
    },

    /// A bare literal.
    Literal {
        /// The literal value.
        value: serde_json::Value,
    },

    /// Same-length list, element-wise.
    List {
        /// Element patterns.
        items: Vec<PatternConfig>,
    },

    /// Map containing at least these keys.
    Map {
        /// Per-key patterns.
        fields: BTreeMap<String, PatternConfig>,
    },

    /// Binary data, segment by segment.
    Bitstring {
        /// Segments, in order.
        segments: Vec<SegmentConfig>,
    },
}

/// Configuration for a [`Segment`].
///
/// ```json
/// { "type": "integer", "size": 16, "attributes": ["little"] }
/// { "type": "binary", "value": "GET " }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SegmentConfig {
    /// Literal to compare against; omit for a free segment.
    #[serde(default)]
    pub value: Option<serde_json::Value>,

    /// Segment type.
    #[serde(rename = "type")]
    pub kind: SegmentType,

    /// Size in units.
    #[serde(default)]
    pub size: Option<u32>,

    /// Unit in bits.
    #[serde(default)]
    pub unit: Option<u32>,

    /// Modifiers.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl PatternConfig {
    /// Convert into a [`Pattern`].
    ///
    /// Unknown kinds, segment types and attributes are already rejected
    /// during deserialization. Malformed segment layouts surface later, from
    /// [`build_match`](crate::build_match).
    #[must_use]
    pub fn into_pattern(self) -> Pattern {
        match self {
            Self::Wildcard => Pattern::Wildcard,
            Self::Variable { name, default } => {
                let var = name.map_or_else(Variable::new, Variable::named);
                Pattern::Variable(match default {
                    Some(d) => var.with_default(Value::from(d)),
                    None => var,
                })
            }
            Self::Capture { pattern } => Pattern::Capture(Box::new(pattern.into_pattern())),
            Self::StartsWith { prefix } => Pattern::StartsWith(prefix),
            Self::HeadTail { head, tail } => Pattern::HeadTail(
                Box::new(head.map_or_else(crate::variable, |p| p.into_pattern())),
                Box::new(tail.map_or_else(crate::variable, |p| p.into_pattern())),
            ),
            Self::Bound { value } => Pattern::Bound(value.into()),
            Self::Literal { value } => Pattern::Literal(value.into()),
            Self::List { items } => {
                Pattern::List(items.into_iter().map(Self::into_pattern).collect())
            }
            Self::Map { fields } => Pattern::Map(
                fields
                    .into_iter()
                    .map(|(k, p)| (k, p.into_pattern()))
                    .collect(),
            ),
            Self::Bitstring { segments } => {
                Pattern::BitString(segments.into_iter().map(SegmentConfig::into_segment).collect())
            }
        }
    }
}

impl From<PatternConfig> for Pattern {
    fn from(config: PatternConfig) -> Self {
        config.into_pattern()
    }
}

impl SegmentConfig {
    /// Convert into a [`Segment`].
    #[must_use]
    pub fn into_segment(self) -> Segment {
        Segment {
            value: self
                .value
                .map_or(SegmentValue::Variable, |v| SegmentValue::Literal(v.into())),
            kind: self.kind,
            unit: self.unit,
            size: self.size,
            attributes: self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{always, build_match, match_pattern};

    fn load(json: &str) -> Pattern {
        serde_json::from_str::<PatternConfig>(json)
            .unwrap()
            .into_pattern()
    }

    #[test]
    fn test_list_config() {
        let p = load(
            r#"{ "type": "list", "items": [
                { "type": "variable" },
                { "type": "literal", "value": 2 },
                { "type": "wildcard" },
                { "type": "literal", "value": 4 }
            ] }"#,
        );
        assert_eq!(
            match_pattern(&p, &Value::list([1, 2, 3, 4]), always).unwrap(),
            vec![Value::from(1)]
        );
    }

    #[test]
    fn test_head_tail_defaults_to_variables() {
        assert_eq!(load(r#"{ "type": "head_tail" }"#), crate::head_tail());
    }

    #[test]
    fn test_named_variable_with_default() {
        let p = load(r#"{ "type": "variable", "name": "n", "default": 10 }"#);
        assert_eq!(p, crate::defaulted("n", 10));
    }

    #[test]
    fn test_capture_and_starts_with() {
        let p = load(
            r#"{ "type": "capture", "pattern": { "type": "starts_with", "prefix": "Bearer " } }"#,
        );
        assert_eq!(
            match_pattern(&p, &Value::from("Bearer t"), always).unwrap(),
            vec![Value::from("t"), Value::from("Bearer t")]
        );
    }

    #[test]
    fn test_map_and_bound() {
        let p = load(
            r#"{ "type": "map", "fields": {
                "kind": { "type": "bound", "value": "user" },
                "id": { "type": "variable", "name": "id" }
            } }"#,
        );
        let value = Value::map([("kind", Value::from("user")), ("id", Value::from(7))]);
        assert_eq!(match_pattern(&p, &value, always).unwrap(), vec![Value::from(7)]);
    }

    #[test]
    fn test_bitstring_config() {
        let p = load(
            r#"{ "type": "bitstring", "segments": [
                { "type": "integer", "value": 1, "size": 16 },
                { "type": "integer", "size": 16, "attributes": ["little"] },
                { "type": "binary" }
            ] }"#,
        );
        let value = Value::Bytes(vec![0, 1, 2, 1, b'o', b'k']);
        assert_eq!(
            match_pattern(&p, &value, always).unwrap(),
            vec![Value::from(0x0102), Value::from("ok")]
        );
    }

    #[test]
    fn test_unknown_kind_rejected_by_serde() {
        assert!(serde_json::from_str::<PatternConfig>(r#"{ "type": "regex" }"#).is_err());
        assert!(serde_json::from_str::<SegmentConfig>(r#"{ "type": "utf7" }"#).is_err());
    }

    #[test]
    fn test_malformed_layout_fails_at_compile() {
        let p = load(
            r#"{ "type": "bitstring", "segments": [
                { "type": "binary" },
                { "type": "integer" }
            ] }"#,
        );
        assert!(build_match(&p).is_err());
    }

    #[test]
    fn test_yaml_config() {
        let yaml = "type: list\nitems:\n  - type: literal\n    value: 1\n  - type: variable\n";
        let p = serde_yaml::from_str::<PatternConfig>(yaml)
            .unwrap()
            .into_pattern();
        assert_eq!(
            match_pattern(&p, &Value::list([1, 5]), always).unwrap(),
            vec![Value::from(5)]
        );
    }
}
