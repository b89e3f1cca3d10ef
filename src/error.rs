// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/sci-coverage)

//! Error taxonomy for pattern compilation, counting and enumeration.

use crate::pattern::parser::ParseError;

/// Errors surfaced by [`crate::Sci`] and the pattern engine.
///
/// Counting and enumeration either fully succeed or fail with one of these;
/// there is no partial-success return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SciError {
    /// The pattern uses a construct outside the supported dialect.
    ///
    /// Currently the only rejected construct is the lookbehind assertion
    /// (`(?<=...)` / `(?<!...)`). Detected at construction time, before any
    /// traversal of the token tree.
    #[error("unsupported lookbehind assertion")]
    UnsupportedConstruct,

    /// A backreference targets a capture group that has not completed at the
    /// point of traversal.
    ///
    /// References may only point backward to already-declared groups; this is
    /// never silently resolved to a default.
    #[error("backreference to unresolved capture group {index}")]
    DanglingBackreference {
        /// 1-based index the reference asked for.
        index: usize,
    },

    /// The pattern source is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SciError::UnsupportedConstruct.to_string(),
            "unsupported lookbehind assertion"
        );
        assert_eq!(
            SciError::DanglingBackreference { index: 3 }.to_string(),
            "backreference to unresolved capture group 3"
        );
    }

    #[test]
    fn test_is_std_error() {
        let err = SciError::UnsupportedConstruct;
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = ParseError {
            message: "expected ')'".to_string(),
            position: 4,
        };
        let err: SciError = parse.clone().into();
        assert_eq!(err, SciError::Parse(parse));
    }
}
