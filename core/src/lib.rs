//! clausal - Structural pattern matching and multi-clause dispatch
//!
//! Erlang/Elixir-style pattern matching over a dynamic [`Value`] model:
//! head/tail destructuring, binary segment matching, guards, and clause
//! overloading by arity with optional trailing defaults.
//!
//! # Architecture
//!
//! - [`Value`]: The dynamic value being matched (primitives, lists, maps, objects)
//! - [`Pattern`]: Closed set of pattern kinds, built with plain constructor functions
//! - [`build_match`]: Compiles a `Pattern` into a [`CompiledPattern`] exactly once
//! - [`Matcher`]: One compiled matcher per pattern kind, non-generic and shareable
//! - [`Dispatcher<R>`]: Arity-indexed clauses with first-match-wins selection
//!
//! # Key Design Insights
//!
//! 1. **Bindings are positional**: every matcher appends to one [`Bindings`]
//!    sequence in depth-first, left-to-right order. Guards and bodies receive
//!    exactly that sequence.
//!
//! 2. **Malformed is not mismatched**: [`PatternError`] is raised at compile
//!    time and never turns into a failed match. [`MatchError`] only ever means
//!    "no clause accepted these arguments".
//!
//! 3. **Compile once**: dispatchers and compiled patterns are immutable and
//!    `Send + Sync`, so a `static` dispatcher serves every caller.
//!
//! # Example
//!
//! ```
//! use clausal::prelude::*;
//!
//! let fact: Dispatcher<i64> = defmatch([
//!     clause([0], |_| 1).unwrap(),
//!     clause([variable()], |args| {
//!         let n = args[0].as_int().unwrap_or(0);
//!         (1..=n).product()
//!     })
//!     .unwrap(),
//! ]);
//!
//! assert_eq!(fact.call(&[Value::from(5)]).unwrap(), 120);
//! ```
//!
//! # Extensions
//!
//! - [`config`]: serde-deserializable pattern configs (feature = `"config"`)
//! - [`clausal-test`](https://docs.rs/clausal-test): YAML conformance fixtures (internal)

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod api;
mod async_dispatch;
mod bindings;
mod bitstring;
mod clause;
mod compile;
mod comprehension;
mod dispatch;
mod matcher;
mod pattern;
mod trace;
mod trampoline;
mod value;

#[cfg(feature = "config")]
pub mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use bindings::Bindings;
pub use compile::{build_match, CompiledPattern};
pub use matcher::Matcher;
pub use pattern::{Pattern, TypePattern, Variable, IGNORE_MARKER};
pub use value::{Atom, Class, Instance, Value};

// Pattern constructors
pub use pattern::{
    bitstring, bound, capture, defaulted, head_tail, head_tail_of, list, literal, map, named,
    starts_with, type_of, type_with, variable, wildcard,
};

// Binary segments
pub use bitstring::{Attribute, BitStringMatcher, Segment, SegmentType, SegmentValue};

// Matching API
pub use api::{always, match_no_throw, match_or_default, match_or_default_async, match_pattern};

// Dispatch
pub use async_dispatch::{async_clause, defmatch_async, AsyncClause, AsyncDispatcher, BoxFuture};
pub use clause::{clause, Clause};
pub use dispatch::{defmatch, defmatchgen, Dispatcher, GenDispatcher, ValueStream};
pub use trampoline::{trampoline, Bounce};

// Comprehensions
pub use comprehension::{list_comprehension, Generator};

// Trace types
pub use trace::{ClauseStep, DispatchTrace, StepOutcome};

// Concrete matchers
pub use matcher::{
    BoundMatcher, CaptureMatcher, HeadTailMatcher, ListMatcher, LiteralMatcher, MapMatcher,
    StartsWithMatcher, TypeMatcher, VariableMatcher, WildcardMatcher,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use clausal::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Matching API
        always,
        // Dispatch
        async_clause,
        // Pattern constructors
        bitstring,
        bound,
        build_match,
        capture,
        clause,
        defaulted,
        defmatch,
        defmatch_async,
        defmatchgen,
        head_tail,
        head_tail_of,
        list,
        list_comprehension,
        literal,
        map,
        match_no_throw,
        match_or_default,
        match_pattern,
        named,
        starts_with,
        trampoline,
        type_of,
        type_with,
        variable,
        wildcard,
        // Core types
        Atom,
        Bindings,
        Bounce,
        Class,
        Clause,
        CompiledPattern,
        Dispatcher,
        // Errors
        Error,
        Generator,
        Instance,
        MatchError,
        MatchErrorKind,
        PatternError,
        Segment,
        SegmentType,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed nesting depth of a pattern.
///
/// Compiling recurses once per level; deeper patterns are rejected with
/// [`PatternError::DepthExceeded`] instead of risking stack overflow.
pub const MAX_DEPTH: usize = 64;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Why a dispatch or single-shot match produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchErrorKind {
    /// Every candidate clause rejected the arguments, or the pattern did not match.
    NoMatch,
    /// No clause accepts this many arguments.
    ArityNotFound,
}

/// No pattern or clause accepted the given arguments.
///
/// The message is `No match for: ` followed by the arguments joined by `,`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MatchError {
    kind: MatchErrorKind,
    message: String,
}

impl MatchError {
    /// No pattern or clause matched `args`.
    #[must_use]
    pub fn no_match(args: &[Value]) -> Self {
        Self::new(MatchErrorKind::NoMatch, args)
    }

    /// No clause accepts `args.len()` arguments.
    #[must_use]
    pub fn arity_not_found(args: &[Value]) -> Self {
        Self::new(MatchErrorKind::ArityNotFound, args)
    }

    fn new(kind: MatchErrorKind, args: &[Value]) -> Self {
        let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
        Self {
            kind,
            message: format!("No match for: {}", rendered.join(",")),
        }
    }

    /// What kind of failure this is.
    #[must_use]
    pub fn kind(&self) -> MatchErrorKind {
        self.kind
    }

    /// The rendered message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A pattern that cannot be compiled.
///
/// Raised by [`build_match`] and clause construction, never during matching.
/// Fix the pattern and compile again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// A variable-width free segment without a size appears before the last segment.
    #[error("segment {index}: unsized {kind} segment must be the last segment")]
    UnsizedSegment {
        /// Position of the segment.
        index: usize,
        /// Its type.
        kind: SegmentType,
    },
    /// `unit * size` is not a whole number of bytes.
    #[error("segment {index}: width of {bits} bits is not a whole number of bytes")]
    UnalignedSegment {
        /// Position of the segment.
        index: usize,
        /// Declared width in bits.
        bits: u64,
    },
    /// The segment type cannot be encoded at this width.
    #[error("segment {index}: {kind} cannot be {bits} bits wide")]
    UnsupportedWidth {
        /// Position of the segment.
        index: usize,
        /// Its type.
        kind: SegmentType,
        /// Declared width in bits.
        bits: u64,
    },
    /// A literal segment's value cannot be encoded as its type.
    #[error("segment {index}: {value_type} literal cannot be encoded as {kind}")]
    InvalidSegmentLiteral {
        /// Position of the segment.
        index: usize,
        /// Its type.
        kind: SegmentType,
        /// Type of the offending literal.
        value_type: &'static str,
    },
    /// A bare literal of a kind that has no pattern form.
    #[error("{value_type} values cannot be used as literal patterns")]
    UnsupportedLiteral {
        /// Type of the offending literal.
        value_type: &'static str,
    },
    /// Pattern nesting exceeds [`MAX_DEPTH`].
    #[error("pattern nesting depth is {depth}, but maximum allowed is {max}")]
    DepthExceeded {
        /// Depth reached.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
}

/// Any error from the single-shot matching API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The value did not match, or the guard rejected it.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// The pattern is malformed.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}
