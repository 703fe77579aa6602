//! Dispatch conformance fixture runner.
//!
//! Each fixture declares clauses as lists of parameter patterns. Every clause
//! body returns its own declaration index plus the bindings it received, so a
//! case can assert both which clause won and what it saw.
//!
//! ```yaml
//! name: factorial_heads
//! clauses:
//!   - params: [{type: literal, value: 0}]
//!   - params: [{type: variable}]
//! cases:
//!   - name: zero
//!     args: [0]
//!     clause: 0
//!     bindings: []
//!   - name: wrong arity
//!     args: [1, 2]
//!     error: arity_not_found
//! ```

use clausal::config::PatternConfig;
use clausal::{clause, defmatch, Dispatcher, MatchErrorKind, Value};
use serde::Deserialize;

/// A dispatch conformance fixture.
#[derive(Debug, Deserialize)]
pub struct DispatchFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub clauses: Vec<ClauseFixture>,
    #[serde(default)]
    pub cases: Vec<DispatchCase>,
}

/// One clause: its parameter patterns.
#[derive(Debug, Deserialize)]
pub struct ClauseFixture {
    pub params: Vec<PatternConfig>,
}

/// Expected failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedError {
    NoMatch,
    ArityNotFound,
}

impl From<ExpectedError> for MatchErrorKind {
    fn from(e: ExpectedError) -> Self {
        match e {
            ExpectedError::NoMatch => Self::NoMatch,
            ExpectedError::ArityNotFound => Self::ArityNotFound,
        }
    }
}

/// A call and its expected outcome.
#[derive(Debug, Deserialize)]
pub struct DispatchCase {
    pub name: String,
    pub args: Vec<serde_json::Value>,
    /// Index of the clause expected to win.
    #[serde(default)]
    pub clause: Option<usize>,
    /// Bindings the winning clause should receive; unchecked when absent.
    #[serde(default)]
    pub bindings: Option<Vec<serde_json::Value>>,
    /// Expected failure; mutually exclusive with `clause`.
    #[serde(default)]
    pub error: Option<ExpectedError>,
}

impl DispatchFixture {
    /// Parse multiple fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Build a dispatcher whose bodies report `(clause index, bindings)`.
    pub fn build(&self) -> Dispatcher<(usize, Vec<Value>)> {
        defmatch(self.clauses.iter().enumerate().map(|(index, c)| {
            let params = c.params.iter().cloned().map(PatternConfig::into_pattern);
            clause(params, move |bindings| (index, bindings.to_vec())).unwrap_or_else(|e| {
                panic!(
                    "Fixture '{}' clause {} failed to compile: {}",
                    self.name, index, e
                )
            })
        }))
    }

    /// Run every case and panic with a descriptive message on the first failure.
    pub fn run_and_assert(&self) {
        let dispatcher = self.build();

        for case in &self.cases {
            let args: Vec<Value> = case.args.iter().cloned().map(Value::from).collect();
            let result = dispatcher.call(&args);

            match (case.error, result) {
                (Some(expected), Err(err)) => assert_eq!(
                    err.kind(),
                    MatchErrorKind::from(expected),
                    "Fixture '{}' case '{}': wrong error kind ({})",
                    self.name,
                    case.name,
                    err,
                ),
                (Some(expected), Ok((index, _))) => panic!(
                    "Fixture '{}' case '{}': expected {:?}, but clause {} matched",
                    self.name, case.name, expected, index,
                ),
                (None, Err(err)) => panic!(
                    "Fixture '{}' case '{}': expected a match, got {}",
                    self.name, case.name, err,
                ),
                (None, Ok((index, bindings))) => {
                    if let Some(expected) = case.clause {
                        assert_eq!(
                            index, expected,
                            "Fixture '{}' case '{}': wrong clause selected",
                            self.name, case.name,
                        );
                    }
                    if let Some(expected) = &case.bindings {
                        let expected: Vec<Value> =
                            expected.iter().cloned().map(Value::from).collect();
                        assert_eq!(
                            bindings, expected,
                            "Fixture '{}' case '{}': wrong bindings",
                            self.name, case.name,
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_dispatch_fixture() {
        let yaml = r"
name: inline
clauses:
  - params: [{type: literal, value: 0}]
  - params: [{type: variable}]
cases:
  - name: zero
    args: [0]
    clause: 0
    bindings: []
  - name: other
    args: [5]
    clause: 1
    bindings: [5]
  - name: no arity
    args: []
    error: arity_not_found
";
        let fixtures = DispatchFixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 1);
        fixtures[0].run_and_assert();
    }
}
