// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/sci-coverage)

//! SCI expression front-end: counting, enumeration and coverage-sequence
//! derivation for dot-separated interaction patterns.
//!
//! A SCI expression names sequences of interaction symbols with a restricted
//! regular-expression dialect: `Open.Close`, `A.B.C+`, `Op.(Sel|Mov).Clo`.
//! The `.` separator is presentation only; it is stripped before
//! tokenization, and generated sequences are re-rendered in dotted form by
//! segmenting against the extracted symbol set.

use std::collections::HashSet;

use crate::common::charset::printable_ascii;
use crate::common::count::Count;
use crate::error::SciError;
use crate::pattern::enumerator::Enumerator;
use crate::pattern::parser::Token;
use crate::pattern::{builder, counter, parser};

/// Default cap on extra repeat counts for unbounded quantifiers.
pub const DEFAULT_MAX_REPETITIONS: u32 = 2;

/// Characters that separate interaction symbols in a SCI expression.
const OPERATORS: &[char] = &[
    '.', '|', '+', '*', '(', ')', '?', '{', '}', '[', ']', '^', '$', '\\',
];

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SciConfig {
    /// Ordered set of character codes classes are resolved against.
    pub alphabet: Vec<u32>,
    /// Extra repeat counts generated beyond a quantifier's minimum when its
    /// upper bound is unbounded. Applies to generation only; counting
    /// reports unbounded quantifiers as infinite.
    pub max_repetitions: u32,
}

impl Default for SciConfig {
    fn default() -> Self {
        Self {
            alphabet: printable_ascii(),
            max_repetitions: DEFAULT_MAX_REPETITIONS,
        }
    }
}

/// A compiled SCI expression.
///
/// Owns the token tree and the target alphabet; counting and enumeration
/// traverse the same immutable tree, so results are deterministic and
/// repeatable. Instances are independent: building one is side-effect-free
/// and fresh instances over the same pattern may be used concurrently.
///
/// # Examples
///
/// ```
/// use sci_coverage::{Count, Sci};
///
/// let sci = Sci::new("O.(S|M).C").unwrap();
/// assert_eq!(sci.count().unwrap(), Count::Finite(2));
/// assert_eq!(sci.interaction_symbols(), ["C", "M", "O", "S"]);
/// assert_eq!(sci.valid_sequences(None).unwrap(), ["O.M.C", "O.S.C"]);
/// ```
#[derive(Debug, Clone)]
pub struct Sci {
    root: Token,
    config: SciConfig,
    symbols: Vec<String>,
}

impl Sci {
    /// Compiles a SCI expression with the default configuration.
    ///
    /// # Errors
    ///
    /// [`SciError::Parse`] if the expression is malformed and
    /// [`SciError::UnsupportedConstruct`] if it uses a lookbehind assertion.
    pub fn new(source: &str) -> Result<Self, SciError> {
        Self::with_config(source, SciConfig::default())
    }

    /// Compiles a SCI expression against a custom alphabet or repetition cap.
    ///
    /// # Errors
    ///
    /// Same as [`Sci::new`].
    pub fn with_config(source: &str, config: SciConfig) -> Result<Self, SciError> {
        let compact: String = source.chars().filter(|&ch| ch != '.').collect();
        let root = parser::parse(&compact)?;
        if root.contains_lookbehind() {
            return Err(SciError::UnsupportedConstruct);
        }
        Ok(Self {
            root,
            config,
            symbols: extract_symbols(source),
        })
    }

    /// Exact number of sequences the expression can produce, or
    /// [`Count::Infinite`] for unbounded quantifiers.
    ///
    /// # Errors
    ///
    /// [`SciError::DanglingBackreference`] if a reference targets a group
    /// that has not completed at its point in the tree.
    pub fn count(&self) -> Result<Count, SciError> {
        counter::count(&self.root, &self.config.alphabet)
    }

    /// Lazy enumerator over the compact (separator-free) strings the
    /// expression can produce.
    ///
    /// Finite even for unbounded quantifiers, which are capped at the
    /// configured `max_repetitions` beyond their minimum. Restartable:
    /// rebuilding or resetting reproduces the identical order.
    ///
    /// # Errors
    ///
    /// Same as [`Sci::count`]; failures surface before any value is yielded.
    pub fn enumerate(&self) -> Result<Enumerator, SciError> {
        builder::build(&self.root, &self.config.alphabet, self.config.max_repetitions)
    }

    /// Interaction symbols of the source expression, deduplicated and
    /// sorted ascending.
    pub fn interaction_symbols(&self) -> &[String] {
        &self.symbols
    }

    /// All sequences the expression accepts, in dotted form, sorted and
    /// deduplicated.
    ///
    /// `coverage_n` overrides the configured repetition cap for unbounded
    /// quantifiers: coverage 0 generates only each quantifier's minimum,
    /// coverage N adds N extra repeat counts.
    ///
    /// # Errors
    ///
    /// Same as [`Sci::enumerate`].
    pub fn valid_sequences(&self, coverage_n: Option<u32>) -> Result<Vec<String>, SciError> {
        let cap = coverage_n.unwrap_or(self.config.max_repetitions);
        let enumerator = builder::build(&self.root, &self.config.alphabet, cap)?;
        let mut sequences: Vec<String> = enumerator.map(|s| self.dotted(&s)).collect();
        sequences.sort();
        sequences.dedup();
        Ok(sequences)
    }

    /// Symbol sequences of length 1..=`coverage_n` that the expression does
    /// NOT accept, in dotted form.
    ///
    /// Candidates are the Cartesian powers of the sorted symbol set (first
    /// position varying slowest), filtered against the valid set generated
    /// with the same coverage bound. Output order is deterministic: length
    /// ascending, then candidate order.
    ///
    /// # Errors
    ///
    /// Same as [`Sci::enumerate`].
    pub fn invalid_sequences(&self, coverage_n: u32) -> Result<Vec<String>, SciError> {
        let valid: HashSet<String> =
            builder::build(&self.root, &self.config.alphabet, coverage_n)?.collect();

        let mut sequences = Vec::new();
        if self.symbols.is_empty() {
            return Ok(sequences);
        }
        for length in 1..=coverage_n as usize {
            let mut indices = vec![0usize; length];
            'candidates: loop {
                let compact: String = indices
                    .iter()
                    .map(|&i| self.symbols[i].as_str())
                    .collect();
                if !valid.contains(&compact) {
                    let dotted: Vec<&str> =
                        indices.iter().map(|&i| self.symbols[i].as_str()).collect();
                    sequences.push(dotted.join("."));
                }
                // Odometer over symbol indices, last position fastest.
                let mut pos = length;
                loop {
                    if pos == 0 {
                        break 'candidates;
                    }
                    pos -= 1;
                    indices[pos] += 1;
                    if indices[pos] < self.symbols.len() {
                        break;
                    }
                    indices[pos] = 0;
                }
            }
        }
        Ok(sequences)
    }

    /// Re-renders a compact generated string in dotted form by greedy
    /// longest-symbol segmentation; characters outside the symbol set become
    /// single-character segments.
    fn dotted(&self, compact: &str) -> String {
        let mut by_length: Vec<&str> = self.symbols.iter().map(String::as_str).collect();
        by_length.sort_by_key(|symbol| std::cmp::Reverse(symbol.len()));

        let mut segments: Vec<&str> = Vec::new();
        let mut rest = compact;
        while let Some(ch) = rest.chars().next() {
            let matched = by_length
                .iter()
                .copied()
                .find(|symbol| rest.starts_with(symbol));
            match matched {
                Some(symbol) => {
                    segments.push(symbol);
                    rest = &rest[symbol.len()..];
                }
                None => {
                    let width = ch.len_utf8();
                    segments.push(&rest[..width]);
                    rest = &rest[width..];
                }
            }
        }
        segments.join(".")
    }
}

/// Splits a SCI expression into its interaction symbols: maximal substrings
/// between pattern operators, deduplicated and sorted ascending.
fn extract_symbols(source: &str) -> Vec<String> {
    let mut symbols: Vec<String> = source
        .split(|ch| OPERATORS.contains(&ch))
        .filter(|fragment| !fragment.is_empty())
        .map(ToString::to_string)
        .collect();
    symbols.sort();
    symbols.dedup();
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One expectation row: expression, valid coverage, invalid coverage,
    /// symbols, valid sequences, invalid sequences.
    struct Expectation {
        sci: &'static str,
        valid_coverage: Option<u32>,
        invalid_coverage: u32,
        symbols: &'static [&'static str],
        valid: &'static [&'static str],
        invalid: &'static [&'static str],
    }

    const EXPECTATIONS: &[Expectation] = &[
        Expectation {
            sci: "O.C",
            valid_coverage: Some(0),
            invalid_coverage: 2,
            symbols: &["C", "O"],
            valid: &["O.C"],
            invalid: &["C", "O", "C.C", "C.O", "O.O"],
        },
        Expectation {
            sci: "O.Z.Z.C",
            valid_coverage: Some(0),
            invalid_coverage: 2,
            symbols: &["C", "O", "Z"],
            valid: &["O.Z.Z.C"],
            invalid: &[
                "C", "O", "Z", "C.C", "C.O", "C.Z", "O.C", "O.O", "O.Z", "Z.C", "Z.O", "Z.Z",
            ],
        },
        Expectation {
            sci: "S|M",
            valid_coverage: Some(0),
            invalid_coverage: 1,
            symbols: &["M", "S"],
            valid: &["M", "S"],
            invalid: &[],
        },
        Expectation {
            sci: "O.(S|M).C",
            valid_coverage: Some(0),
            invalid_coverage: 1,
            symbols: &["C", "M", "O", "S"],
            valid: &["O.M.C", "O.S.C"],
            invalid: &["C", "M", "O", "S"],
        },
        Expectation {
            sci: "Open.Close",
            valid_coverage: Some(0),
            invalid_coverage: 2,
            symbols: &["Close", "Open"],
            valid: &["Open.Close"],
            invalid: &["Close", "Open", "Close.Close", "Close.Open", "Open.Open"],
        },
        Expectation {
            sci: "Select|Move",
            valid_coverage: Some(0),
            invalid_coverage: 1,
            symbols: &["Move", "Select"],
            valid: &["Move", "Select"],
            invalid: &[],
        },
        Expectation {
            sci: "Op.(Sel|Mov).Clo",
            valid_coverage: None,
            invalid_coverage: 1,
            symbols: &["Clo", "Mov", "Op", "Sel"],
            valid: &["Op.Mov.Clo", "Op.Sel.Clo"],
            invalid: &["Clo", "Mov", "Op", "Sel"],
        },
        Expectation {
            sci: "O.C*",
            valid_coverage: Some(3),
            invalid_coverage: 2,
            symbols: &["C", "O"],
            valid: &["O", "O.C", "O.C.C", "O.C.C.C"],
            invalid: &["C", "C.C", "C.O", "O.O"],
        },
        Expectation {
            sci: "O.C+",
            valid_coverage: Some(3),
            invalid_coverage: 2,
            symbols: &["C", "O"],
            valid: &["O.C", "O.C.C", "O.C.C.C", "O.C.C.C.C"],
            invalid: &["C", "O", "C.C", "C.O", "O.O"],
        },
        Expectation {
            sci: "A+",
            valid_coverage: Some(3),
            invalid_coverage: 2,
            symbols: &["A"],
            valid: &["A", "A.A", "A.A.A", "A.A.A.A"],
            invalid: &[],
        },
        Expectation {
            sci: "A.B.C+",
            valid_coverage: Some(0),
            invalid_coverage: 1,
            symbols: &["A", "B", "C"],
            valid: &["A.B.C"],
            invalid: &["A", "B", "C"],
        },
        Expectation {
            sci: "A.B.C+",
            valid_coverage: Some(1),
            invalid_coverage: 1,
            symbols: &["A", "B", "C"],
            valid: &["A.B.C", "A.B.C.C"],
            invalid: &["A", "B", "C"],
        },
        Expectation {
            sci: "A.B.C+",
            valid_coverage: Some(2),
            invalid_coverage: 2,
            symbols: &["A", "B", "C"],
            valid: &["A.B.C", "A.B.C.C", "A.B.C.C.C"],
            invalid: &[
                "A", "B", "C", "A.A", "A.B", "A.C", "B.A", "B.B", "B.C", "C.A", "C.B", "C.C",
            ],
        },
        Expectation {
            sci: "a.b*",
            valid_coverage: Some(2),
            invalid_coverage: 2,
            symbols: &["a", "b"],
            valid: &["a", "a.b", "a.b.b"],
            invalid: &["b", "a.a", "b.a", "b.b"],
        },
    ];

    #[test]
    fn test_expectation_table() {
        for row in EXPECTATIONS {
            let sci = Sci::new(row.sci).unwrap();
            assert_eq!(
                sci.interaction_symbols(),
                row.symbols,
                "symbols for {}",
                row.sci
            );
            assert_eq!(
                sci.valid_sequences(row.valid_coverage).unwrap(),
                row.valid,
                "valid sequences for {}",
                row.sci
            );
            assert_eq!(
                sci.invalid_sequences(row.invalid_coverage).unwrap(),
                row.invalid,
                "invalid sequences for {}",
                row.sci
            );
        }
    }

    #[test]
    fn test_count_scenarios() {
        assert_eq!(Sci::new("O.C").unwrap().count().unwrap(), Count::Finite(1));
        assert_eq!(Sci::new("S|M").unwrap().count().unwrap(), Count::Finite(2));
        assert_eq!(
            Sci::new("O.(S|M).C").unwrap().count().unwrap(),
            Count::Finite(2)
        );
        assert_eq!(Sci::new("O.C*").unwrap().count().unwrap(), Count::Infinite);
    }

    #[test]
    fn test_enumerate_yields_compact_strings() {
        let strings: Vec<String> = Sci::new("O.(S|M).C")
            .unwrap()
            .enumerate()
            .unwrap()
            .collect();
        assert_eq!(strings, vec!["OSC", "OMC"]);
    }

    #[test]
    fn test_enumerate_with_configured_cap() {
        let sci = Sci::with_config(
            "O.C*",
            SciConfig {
                max_repetitions: 3,
                ..SciConfig::default()
            },
        )
        .unwrap();
        let strings: Vec<String> = sci.enumerate().unwrap().collect();
        assert_eq!(strings, vec!["O", "OC", "OCC", "OCCC"]);
    }

    #[test]
    fn test_finite_count_matches_enumeration_length() {
        for source in ["O.C", "S|M", "O.(S|M).C", "Op.(Sel|Mov).Clo"] {
            let sci = Sci::new(source).unwrap();
            let count = sci.count().unwrap();
            let total = sci.enumerate().unwrap().count() as u64;
            assert_eq!(count, Count::Finite(total), "mismatch for {source}");
        }
    }

    #[test]
    fn test_unbounded_count_disagrees_with_truncated_enumeration() {
        let sci = Sci::new("A+").unwrap();
        assert_eq!(sci.count().unwrap(), Count::Infinite);
        assert!(sci.enumerate().unwrap().count() > 0);
    }

    #[test]
    fn test_dangling_backreference_fails_count_and_enumerate() {
        let sci = Sci::new(r"(A)\2").unwrap();
        assert_eq!(
            sci.count().unwrap_err(),
            SciError::DanglingBackreference { index: 2 }
        );
        assert_eq!(
            sci.enumerate().map(|_| ()).unwrap_err(),
            SciError::DanglingBackreference { index: 2 }
        );
    }

    #[test]
    fn test_lookbehind_rejected_at_construction() {
        assert_eq!(
            Sci::new("(?<=A)B").unwrap_err(),
            SciError::UnsupportedConstruct
        );
    }

    #[test]
    fn test_backreference_sequences_repeat_the_capture() {
        let sci = Sci::new(r"(Sel|Mov).\1").unwrap();
        assert_eq!(
            sci.valid_sequences(Some(0)).unwrap(),
            vec!["Mov.Mov", "Sel.Sel"]
        );
    }

    #[test]
    fn test_multichar_symbol_segmentation() {
        let sci = Sci::new("Open.Close").unwrap();
        let strings: Vec<String> = sci.enumerate().unwrap().collect();
        assert_eq!(strings, vec!["OpenClose"]);
        assert_eq!(sci.valid_sequences(Some(0)).unwrap(), vec!["Open.Close"]);
    }

    #[test]
    fn test_invalid_sequences_empty_symbol_set() {
        let sci = Sci::new("(|)").unwrap();
        assert_eq!(sci.invalid_sequences(2).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_invalid_sequences_zero_coverage() {
        let sci = Sci::new("O.C").unwrap();
        assert_eq!(sci.invalid_sequences(0).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_valid_sequences_deterministic() {
        let sci = Sci::new("Op.(Sel|Mov).Clo").unwrap();
        assert_eq!(
            sci.valid_sequences(None).unwrap(),
            sci.valid_sequences(None).unwrap()
        );
    }

    #[test]
    fn test_default_config() {
        let config = SciConfig::default();
        assert_eq!(config.max_repetitions, DEFAULT_MAX_REPETITIONS);
        assert_eq!(config.alphabet.len(), 95);
    }

    #[test]
    fn test_custom_alphabet_restricts_classes() {
        let sci = Sci::with_config(
            "[A-Z]",
            SciConfig {
                alphabet: vec!['A' as u32, 'B' as u32],
                ..SciConfig::default()
            },
        )
        .unwrap();
        let strings: Vec<String> = sci.enumerate().unwrap().collect();
        assert_eq!(strings, vec!["A", "B"]);
    }
}
