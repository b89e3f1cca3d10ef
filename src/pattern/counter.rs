// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/sci-coverage)

//! Cardinality pass over the token tree.
//!
//! Mirrors the enumerator builder's dispatch exactly (same branch
//! normalization, same negative-lookahead filtering, same optional-quantifier
//! flattening) so that a finite count always equals the length of the full
//! enumeration. The two passes intentionally disagree on unbounded
//! repetition: counting reports [`Count::Infinite`] while generation truncates
//! at a configured cap, letting callers detect a truncated sample.

use crate::common::count::Count;
use crate::error::SciError;
use crate::pattern::parser::{Group, Token};

/// Counts the strings the pattern tree can produce.
///
/// # Errors
///
/// [`SciError::UnsupportedConstruct`] if the tree contains a lookbehind
/// assertion; [`SciError::DanglingBackreference`] if a reference targets a
/// capture group that has not completed at its point in the traversal.
///
/// # Examples
///
/// ```
/// use sci_coverage::common::charset::printable_ascii;
/// use sci_coverage::common::count::Count;
/// use sci_coverage::pattern::{counter, parser};
///
/// let root = parser::parse("O(S|M)C").unwrap();
/// assert_eq!(counter::count(&root, &printable_ascii()).unwrap(), Count::Finite(2));
/// ```
pub fn count(root: &Token, alphabet: &[u32]) -> Result<Count, SciError> {
    if root.contains_lookbehind() {
        return Err(SciError::UnsupportedConstruct);
    }
    let mut completed = Vec::new();
    count_token(root, alphabet, &mut completed)
}

/// Total strings for `min..=max` repetitions of a sub-pattern that produces
/// `per_iteration` strings each time.
///
/// Each repeat count `k` contributes `per_iteration ^ k` combinations, so the
/// total is the geometric sum over `min..=max`, computed in closed form.
/// Overflow coerces to [`Count::Infinite`].
#[must_use]
pub fn repetition_total(per_iteration: Count, min: u32, max: u32) -> Count {
    debug_assert!(min <= max);
    match per_iteration {
        // min <= max == 0 means the only repeat count is zero: the empty string.
        Count::Infinite => {
            if max == 0 {
                Count::Finite(1)
            } else {
                Count::Infinite
            }
        }
        Count::Finite(0) => Count::Finite(u64::from(min == 0)),
        Count::Finite(1) => Count::Finite(u64::from(max) - u64::from(min) + 1),
        Count::Finite(c) => {
            let hi = max.checked_add(1).and_then(|exp| geometric_partial(c, exp));
            let lo = geometric_partial(c, min);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Count::Finite(hi - lo),
                _ => Count::Infinite,
            }
        }
    }
}

/// `(c^exp - 1) / (c - 1)` for `c >= 2`, or `None` on overflow.
fn geometric_partial(c: u64, exp: u32) -> Option<u64> {
    let power = c.checked_pow(exp)?;
    Some((power - 1) / (c - 1))
}

fn count_token(
    token: &Token,
    alphabet: &[u32],
    completed: &mut Vec<usize>,
) -> Result<Count, SciError> {
    match token {
        Token::Group(group) => count_group(group, alphabet, completed),
        Token::Anchor(anchor) => Ok(if anchor.matches_empty() {
            Count::ONE
        } else {
            Count::ZERO
        }),
        Token::Set(class) => Ok(Count::Finite(class.resolve(alphabet).len() as u64)),
        Token::Repetition(rep) => {
            let rep = rep.flattened();
            // Count the inner pattern first so capture groups inside it
            // complete and dangling references are detected even when the
            // overall total is declared infinite.
            let inner = count_token(&rep.inner, alphabet, completed)?;
            match rep.max {
                None => Ok(Count::Infinite),
                Some(max) => Ok(repetition_total(inner, rep.min, max)),
            }
        }
        Token::Reference(index) => {
            if completed.contains(index) {
                Ok(Count::ONE)
            } else {
                Err(SciError::DanglingBackreference { index: *index })
            }
        }
        Token::Char(_) => Ok(Count::ONE),
    }
}

fn count_group(
    group: &Group,
    alphabet: &[u32],
    completed: &mut Vec<usize>,
) -> Result<Count, SciError> {
    let mut total = Count::ZERO;
    for branch in group.normalized_branches() {
        let mut product = Count::ONE;
        for child in branch {
            product = product * count_token(child, alphabet, completed)?;
        }
        total = total + product;
    }
    // A capture group completes only after its own subtree has been counted,
    // so self- and forward references fail as dangling.
    if let Some(index) = group.index {
        completed.push(index);
    }
    Ok(total)
}
