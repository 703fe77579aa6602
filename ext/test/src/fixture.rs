//! Pattern conformance fixture runner.
//!
//! Loads YAML fixtures in the pattern config format and runs them against the
//! engine: YAML → `PatternConfig` → `build_match()` → bind.
//!
//! ```yaml
//! name: list_with_wildcard
//! pattern:
//!   type: list
//!   items:
//!     - type: variable
//!     - type: wildcard
//! cases:
//!   - name: pair
//!     value: [1, 2]
//!     expect: [1]
//!   - name: scalar
//!     value: 7
//!     expect: null   # no match
//! ```

use clausal::config::PatternConfig;
use clausal::{build_match, Value};
use serde::Deserialize;

/// A pattern conformance fixture.
///
/// The `pattern` field is kept as raw JSON so error fixtures can exercise the
/// deserialization step as well as compilation.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub pattern: serde_json::Value,
    #[serde(default)]
    pub cases: Vec<TestCase>,
    #[serde(default)]
    pub expect_error: bool,
}

/// A test case within a fixture.
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    /// The candidate, as JSON.
    #[serde(default)]
    pub value: serde_json::Value,
    /// Raw bytes candidate; overrides `value` when present.
    #[serde(default)]
    pub bytes: Option<Vec<u8>>,
    /// Expected bindings; `None` means the value must not match.
    pub expect: Option<Vec<serde_json::Value>>,
}

impl Fixture {
    /// Parse a single fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run every case and panic with a descriptive message on the first failure.
    pub fn run_and_assert(&self) {
        let parsed = serde_json::from_value::<PatternConfig>(self.pattern.clone());

        if self.expect_error {
            match parsed {
                Err(e) => println!("    -> parse error: {e} (expected)"),
                Ok(config) => {
                    let result = build_match(&config.into_pattern());
                    match result {
                        Err(e) => println!("    -> compile error: {e} (expected)"),
                        Ok(_) => panic!(
                            "Fixture '{}' expected error but pattern compiled",
                            self.name
                        ),
                    }
                }
            }
            return;
        }

        let config = parsed.unwrap_or_else(|e| {
            panic!("Fixture '{}' pattern parse failed: {}", self.name, e);
        });
        let compiled = build_match(&config.into_pattern()).unwrap_or_else(|e| {
            panic!("Fixture '{}' pattern compile failed: {}", self.name, e);
        });

        for case in &self.cases {
            let actual = compiled.bind(&case.candidate());
            let expected = case.expected();
            assert_eq!(
                actual, expected,
                "Fixture '{}' case '{}': expected {:?}, got {:?}",
                self.name, case.name, expected, actual,
            );
        }
    }
}

impl TestCase {
    /// The candidate value.
    #[must_use]
    pub fn candidate(&self) -> Value {
        match &self.bytes {
            Some(bytes) => Value::Bytes(bytes.clone()),
            None => Value::from(self.value.clone()),
        }
    }

    /// The expected bindings, converted to values.
    #[must_use]
    pub fn expected(&self) -> Option<Vec<Value>> {
        self.expect
            .as_ref()
            .map(|vs| vs.iter().cloned().map(Value::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_run_inline_fixture() {
        let yaml = r"
name: inline
pattern:
  type: starts_with
  prefix: 'Bearer '
cases:
  - name: token
    value: Bearer 1234
    expect: ['1234']
  - name: other scheme
    value: Token 1234
    expect: null
";
        let fixture = Fixture::from_yaml(yaml).unwrap();
        assert_eq!(fixture.cases.len(), 2);
        fixture.run_and_assert();
    }

    #[test]
    fn test_bytes_override_value() {
        let case = TestCase {
            name: "b".into(),
            value: serde_json::Value::Null,
            bytes: Some(vec![42]),
            expect: Some(vec![serde_json::json!(42)]),
        };
        assert_eq!(case.candidate(), Value::Bytes(vec![42]));
        assert_eq!(case.expected(), Some(vec![Value::from(42)]));
    }

    #[test]
    fn test_multi_document() {
        let yaml = "name: a\npattern: {type: wildcard}\n---\nname: b\npattern: {type: wildcard}\n";
        let fixtures = Fixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].name, "b");
    }
}
