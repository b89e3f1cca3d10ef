//! # `sci_coverage` — Test Sequence Generation for SCI Expressions
//!
//! Interprets SCI expressions (Sequences of Characterized Interactions), a
//! restricted regular-expression dialect over named interaction symbols such
//! as `Open.Close`, `A.B.C+` or `Op.(Sel|Mov).Clo`, and derives
//! coverage-driven test data from the compiled pattern tree.
//!
//! ## Operations
//!
//! | Operation | Description |
//! |-----------|-------------|
//! | [`Sci::count`] | Exact or declared-infinite number of accepted sequences |
//! | [`Sci::enumerate`] | Lazy, restartable enumeration of accepted strings |
//! | [`Sci::interaction_symbols`] | Sorted interaction symbols of the expression |
//! | [`Sci::valid_sequences`] | Accepted sequences in dotted form, coverage-bounded |
//! | [`Sci::invalid_sequences`] | Rejected symbol permutations for negative tests |
//!
//! ## Example
//!
//! ```
//! use sci_coverage::{Count, Sci};
//!
//! let sci = Sci::new("O.(S|M).C").unwrap();
//! assert_eq!(sci.count().unwrap(), Count::Finite(2));
//! assert_eq!(sci.valid_sequences(None).unwrap(), ["O.M.C", "O.S.C"]);
//! ```
//!
//! Enumeration order is a contract: alternation yields declared-branch order,
//! concatenation varies its last element fastest, repetition ascends through
//! repeat counts. Unbounded quantifiers are capped for generation (see
//! [`SciConfig::max_repetitions`]) while counting reports them as
//! [`Count::Infinite`], so callers can detect a truncated sample.

pub mod common;
pub mod error;
pub mod pattern;
pub mod sci;

pub use common::count::Count;
pub use error::SciError;
pub use pattern::enumerator::Enumerator;
pub use sci::{Sci, SciConfig, DEFAULT_MAX_REPETITIONS};
