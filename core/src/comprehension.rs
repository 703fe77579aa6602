//! List comprehensions: `for {a, b} <- pairs, c <- cs, guard, do: body`

use crate::{always, build_match, Pattern, PatternError, Value};

/// One `pattern <- source` clause of a comprehension.
///
/// Elements of `source` that do not match `pattern` are skipped.
#[derive(Debug, Clone)]
pub struct Generator {
    /// Pattern each element must match.
    pub pattern: Pattern,
    /// Elements to draw from.
    pub source: Vec<Value>,
}

impl Generator {
    /// Create a generator.
    pub fn new(pattern: impl Into<Pattern>, source: impl IntoIterator<Item = Value>) -> Self {
        Self {
            pattern: pattern.into(),
            source: source.into_iter().collect(),
        }
    }
}

/// Evaluate a comprehension.
///
/// Generators combine as a cartesian product, first generator outermost.
/// Each combination's bindings are the generators' bindings concatenated in
/// order; `guard` filters combinations and `body` maps the survivors.
///
/// # Errors
///
/// Returns [`PatternError`] if a generator's pattern is malformed.
///
/// # Example
///
/// ```
/// use clausal::{list, list_comprehension, variable, Generator, Value};
///
/// let pairs = Generator::new(
///     list([variable(), variable()]),
///     [Value::list([1, 2]), Value::from("skipped"), Value::list([3, 4])],
/// );
/// let sums = list_comprehension([pairs], |_| true, |b| {
///     b[0].as_int().unwrap_or(0) + b[1].as_int().unwrap_or(0)
/// })
/// .unwrap();
/// assert_eq!(sums, vec![3, 7]);
/// ```
pub fn list_comprehension<R, I, G, F>(
    generators: I,
    guard: G,
    body: F,
) -> Result<Vec<R>, PatternError>
where
    I: IntoIterator<Item = Generator>,
    G: Fn(&[Value]) -> bool,
    F: Fn(&[Value]) -> R,
{
    let mut combos: Vec<Vec<Value>> = vec![Vec::new()];
    for generator in generators {
        let compiled = build_match(&generator.pattern)?;
        let matched: Vec<Vec<Value>> = generator
            .source
            .iter()
            .filter_map(|item| compiled.match_no_throw(item, always))
            .collect();

        combos = combos
            .iter()
            .flat_map(|prefix| {
                matched.iter().map(move |bindings| {
                    let mut combo = prefix.clone();
                    combo.extend_from_slice(bindings);
                    combo
                })
            })
            .collect();
    }

    Ok(combos
        .iter()
        .filter(|combo| guard(combo))
        .map(|combo| body(combo))
        .collect())
}
