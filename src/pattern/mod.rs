// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/sci-coverage)

//! Pattern tokenization, counting and enumeration.
//!
//! Implements the restricted regular-expression dialect SCI expressions are
//! written in, and the two mirrored passes over its token tree: cardinality
//! ([`counter`]) and lazy generation ([`builder`] / [`enumerator`]).
//!
//! # Dialect
//!
//! ```text
//! ab          — concatenation
//! a|b         — alternation, enumerated in declared order
//! (ab)        — capture group, numbered 1-based in opening-paren order
//! (?:ab)      — non-capture group
//! (?=a) (?!a) — lookahead; negative lookahead is dropped from branches
//! [abc] [a-z] — character class, [^...] negated, resolved against the alphabet
//! \d \w \s    — predefined classes (and \D \W \S negated)
//! a* a+ a?    — quantifiers; {m} {m,} {m,n} bounded forms
//! \1 .. \9    — backreference to an earlier capture group
//! ^ $ \b \B   — anchors, zero-width
//! ```
//!
//! Lookbehind assertions (`(?<=...)`, `(?<!...)`) are tokenized but rejected
//! by both passes before traversal.

pub mod builder;
pub mod counter;
pub mod enumerator;
pub mod parser;
