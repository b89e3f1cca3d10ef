// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/sci-coverage)

//! Set algebra over ordered sequences of character codes.
//!
//! Character classes are resolved against a fixed alphabet by intersection
//! and difference; the alphabet's order (ascending code points for the
//! default) is preserved, so resolved sets are deterministic. All operations
//! are pure, total functions with no failure mode.

/// Returns the default alphabet: printable ASCII, codes 32..=126.
#[must_use]
pub fn printable_ascii() -> Vec<u32> {
    (32..=126).collect()
}

/// Union of two code sequences by concatenation, preserving order.
///
/// Duplicates are not removed here; callers resolve against an alphabet
/// (which holds each code once) before a set becomes observable.
#[must_use]
pub fn union(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

/// Elements of `a` that are also in `b`, in `a`'s order.
#[must_use]
pub fn intersection(a: &[u32], b: &[u32]) -> Vec<u32> {
    a.iter().copied().filter(|code| b.contains(code)).collect()
}

/// Elements of `a` that are not in `b`, in `a`'s order.
#[must_use]
pub fn difference(a: &[u32], b: &[u32]) -> Vec<u32> {
    a.iter().copied().filter(|code| !b.contains(code)).collect()
}

/// Removes structurally-duplicate items, preserving first-occurrence order.
///
/// Uses `PartialEq` (structural equality), not hashing, so item order inside
/// each element matters and equal-but-reordered elements are kept distinct.
#[must_use]
pub fn distinct<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
