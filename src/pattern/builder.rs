// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/sci-coverage)

//! Enumerator construction from the token tree.
//!
//! Mirrors the counter's dispatch exactly (same branch normalization, same
//! negative-lookahead filtering, same optional-quantifier flattening) so that
//! a finite count always equals the number of strings the built enumerator
//! yields. The group table is populated once per build pass: a capture
//! group's cell is registered when its subtree completes, and a backreference
//! may only resolve an already-registered index.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::SciError;
use crate::pattern::enumerator::{
    Alternation, Backreference, BoundedRepetition, Capture, Concatenation, Enumerator, GroupCell,
    Literal,
};
use crate::pattern::parser::{Group, Token};

/// Builds the enumerator for a pattern tree.
///
/// `max_repetitions` bounds generation for unbounded quantifiers only: an
/// unbounded upper bound is capped at `min + max_repetitions` repeat counts.
/// Bounded quantifiers are enumerated in full. The counter applies no such
/// cap, so a pattern with an unbounded quantifier counts as infinite while
/// its enumeration stays finite; callers can detect the truncation by
/// comparing the two.
///
/// # Errors
///
/// [`SciError::UnsupportedConstruct`] if the tree contains a lookbehind
/// assertion; [`SciError::DanglingBackreference`] if a reference targets a
/// capture group that has not completed at its point in the traversal. Both
/// surface before the returned enumerator yields anything.
///
/// # Examples
///
/// ```
/// use sci_coverage::common::charset::printable_ascii;
/// use sci_coverage::pattern::{builder, parser};
///
/// let root = parser::parse("O(S|M)C").unwrap();
/// let strings: Vec<String> = builder::build(&root, &printable_ascii(), 2)
///     .unwrap()
///     .collect();
/// assert_eq!(strings, vec!["OSC", "OMC"]);
/// ```
pub fn build(
    root: &Token,
    alphabet: &[u32],
    max_repetitions: u32,
) -> Result<Enumerator, SciError> {
    if root.contains_lookbehind() {
        return Err(SciError::UnsupportedConstruct);
    }
    let mut groups = BTreeMap::new();
    build_token(root, alphabet, max_repetitions, &mut groups)
}

fn build_token(
    token: &Token,
    alphabet: &[u32],
    max_repetitions: u32,
    groups: &mut BTreeMap<usize, GroupCell>,
) -> Result<Enumerator, SciError> {
    match token {
        Token::Group(group) => build_group(group, alphabet, max_repetitions, groups),
        Token::Anchor(anchor) => {
            // Transparent anchors match without consuming characters; an
            // unrecognized anchor contributes nothing and kills its branch.
            let values = if anchor.matches_empty() {
                vec![String::new()]
            } else {
                Vec::new()
            };
            Ok(Enumerator::Literal(Literal::new(values)))
        }
        Token::Set(class) => {
            let values = class
                .resolve(alphabet)
                .into_iter()
                .filter_map(char::from_u32)
                .map(String::from)
                .collect();
            Ok(Enumerator::Literal(Literal::new(values)))
        }
        Token::Repetition(rep) => {
            let rep = rep.flattened();
            let prototype = build_token(&rep.inner, alphabet, max_repetitions, groups)?;
            let max = rep
                .max
                .unwrap_or_else(|| rep.min.saturating_add(max_repetitions));
            Ok(Enumerator::Repetition(BoundedRepetition::new(
                prototype, rep.min, max,
            )))
        }
        Token::Reference(index) => match groups.get(index) {
            Some(cell) => Ok(Enumerator::Reference(Backreference::new(Rc::clone(cell)))),
            None => Err(SciError::DanglingBackreference { index: *index }),
        },
        Token::Char(code) => {
            let values = char::from_u32(*code)
                .map(|ch| vec![ch.to_string()])
                .unwrap_or_default();
            Ok(Enumerator::Literal(Literal::new(values)))
        }
    }
}

fn build_group(
    group: &Group,
    alphabet: &[u32],
    max_repetitions: u32,
    groups: &mut BTreeMap<usize, GroupCell>,
) -> Result<Enumerator, SciError> {
    let branches = group.normalized_branches();
    let mut built = Vec::with_capacity(branches.len());
    for branch in &branches {
        let children = branch
            .iter()
            .map(|child| build_token(child, alphabet, max_repetitions, groups))
            .collect::<Result<Vec<_>, _>>()?;
        built.push(Enumerator::Concatenation(Concatenation::new(children)));
    }

    let inner = if built.len() == 1 {
        built.remove(0)
    } else {
        Enumerator::Alternation(Alternation::new(built))
    };

    // Registration happens after the subtree is built, so self- and forward
    // references fail as dangling, matching the counter.
    if let Some(index) = group.index {
        let cell = GroupCell::default();
        groups.insert(index, Rc::clone(&cell));
        return Ok(Enumerator::Capture(Capture::new(inner, cell)));
    }
    Ok(inner)
}
