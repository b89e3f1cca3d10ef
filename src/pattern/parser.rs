// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/sci-coverage)

//! Recursive descent tokenizer for SCI pattern strings.
//!
//! Parses a restricted regular-expression dialect like `OC*`, `O(S|M)C` or
//! `(AB)\1` into a typed token tree consumed by the counter and the
//! enumerator builder. The tree is immutable once produced; normalization
//! (branch lists, optional-quantifier flattening) happens in pure derivations
//! so the same tree can be traversed any number of times.

use std::fmt;

use crate::common::charset::{difference, intersection, union};

/// A node in the token tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Root, parenthesized group or assertion; carries alternation branches.
    Group(Group),
    /// Character class, predefined class or the any-character dot.
    Set(CharClass),
    /// A single literal character code.
    Char(u32),
    /// Quantified sub-pattern.
    Repetition(Repetition),
    /// Backreference to a capture group, 1-based.
    Reference(usize),
    /// Zero-width position assertion.
    Anchor(Anchor),
}

impl Token {
    /// True if this subtree contains a lookbehind assertion anywhere.
    ///
    /// Lookbehind is outside the supported dialect; the engine rejects such
    /// trees before traversal begins.
    #[must_use]
    pub fn contains_lookbehind(&self) -> bool {
        match self {
            Self::Group(group) => {
                matches!(group.kind, GroupKind::Lookbehind)
                    || group
                        .branches
                        .iter()
                        .flatten()
                        .any(Self::contains_lookbehind)
            }
            Self::Repetition(rep) => rep.inner.contains_lookbehind(),
            Self::Set(_) | Self::Char(_) | Self::Reference(_) | Self::Anchor(_) => false,
        }
    }

    pub(crate) fn is_negative_lookahead(&self) -> bool {
        matches!(
            self,
            Self::Group(Group {
                kind: GroupKind::NegativeLookahead,
                ..
            })
        )
    }
}

/// How a group participates in matching and capture numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// `(...)`, remembered and referenceable by index.
    Capture,
    /// `(?:...)`, groups without capturing.
    NonCapture,
    /// `(?=...)`, kept in the tree but not remembered.
    PositiveLookahead,
    /// `(?!...)`, dropped from branches before counting or enumeration.
    NegativeLookahead,
    /// `(?<=...)` / `(?<!...)`, unsupported; the engine rejects the tree.
    Lookbehind,
}

/// Root or parenthesized sub-pattern with its alternation branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Capture behavior of this group.
    pub kind: GroupKind,
    /// 1-based capture index in first-seen (opening parenthesis) order.
    /// `Some` exactly when `kind` is [`GroupKind::Capture`].
    pub index: Option<usize>,
    /// Alternation branches in declared order; a group without `|` has one.
    pub branches: Vec<Vec<Token>>,
}

impl Group {
    /// Branches ready for counting or enumeration: negative-lookahead
    /// children are dropped from each branch (they contribute no characters),
    /// then structurally-duplicate branches are removed preserving
    /// first-occurrence order.
    ///
    /// Pure derivation; the tree itself is never annotated or mutated, so
    /// repeated traversals see identical branch lists.
    #[must_use]
    pub fn normalized_branches(&self) -> Vec<Vec<&Token>> {
        let filtered: Vec<Vec<&Token>> = self
            .branches
            .iter()
            .map(|branch| {
                branch
                    .iter()
                    .filter(|token| !token.is_negative_lookahead())
                    .collect()
            })
            .collect();
        crate::common::charset::distinct(filtered)
    }
}

/// A quantified sub-pattern: `min..=max` repetitions of `inner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
    /// Minimum repeat count.
    pub min: u32,
    /// Maximum repeat count; `None` means unbounded (`*`, `+`, `{m,}`).
    pub max: Option<u32>,
    /// The repeated sub-pattern.
    pub inner: Box<Token>,
}

impl Repetition {
    /// Collapses the `{0,1}` wrapper the tokenizer produces for quantifier
    /// stacking such as `a+?`: an optional repetition directly wrapping
    /// another repetition is equivalent to the inner repetition alone.
    #[must_use]
    pub fn flattened(&self) -> &Self {
        if self.min == 0 && self.max == Some(1) {
            if let Token::Repetition(inner) = self.inner.as_ref() {
                return inner;
            }
        }
        self
    }
}

/// Zero-width position assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `^`
    Start,
    /// `$`
    End,
    /// `\b`
    WordBoundary,
    /// `\B`
    NonWordBoundary,
}

impl Anchor {
    /// True if this anchor holds trivially within a generated sequence and
    /// therefore contributes the empty string.
    ///
    /// `\B` never holds between interaction symbols drawn from a single
    /// alphabet, so it is treated as non-matching and eliminates its branch.
    #[must_use]
    pub const fn matches_empty(self) -> bool {
        matches!(self, Self::Start | Self::End | Self::WordBoundary)
    }
}

/// Character class contents before resolution against an alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    /// True for `[^...]` and the negated predefined classes (`\D`, `\W`, `\S`).
    pub negated: bool,
    /// Class members in source order.
    pub items: Vec<ClassItem>,
}

/// One member of a character class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassItem {
    /// A single character code.
    Char(u32),
    /// An inclusive code range, `from <= to`.
    Range {
        /// First code in the range.
        from: u32,
        /// Last code in the range.
        to: u32,
    },
    /// A predefined class nested inside `[...]`, e.g. `[\d-]`.
    Class(CharClass),
}

impl CharClass {
    /// Resolves this class against `alphabet` via intersection/difference.
    ///
    /// The result is always a subset of the alphabet in the alphabet's own
    /// order (ascending code points for the default), and may be empty. An
    /// empty result is a structural zero, not an error: the enclosing branch
    /// simply produces no strings.
    #[must_use]
    pub fn resolve(&self, alphabet: &[u32]) -> Vec<u32> {
        let mut set: Vec<u32> = Vec::new();
        for item in &self.items {
            match item {
                ClassItem::Char(code) => set.push(*code),
                ClassItem::Range { from, to } => set.extend(*from..=*to),
                ClassItem::Class(inner) => {
                    let data = inner.raw_codes();
                    let resolved = if inner.negated {
                        difference(alphabet, &data)
                    } else {
                        intersection(alphabet, &data)
                    };
                    set = union(&set, &resolved);
                }
            }
        }
        if self.negated {
            difference(alphabet, &set)
        } else {
            intersection(alphabet, &set)
        }
    }

    /// Flattens chars and ranges to raw codes. Negation of classes nested
    /// deeper than one level is not representable in the dialect and is
    /// ignored here.
    fn raw_codes(&self) -> Vec<u32> {
        let mut codes = Vec::new();
        for item in &self.items {
            match item {
                ClassItem::Char(code) => codes.push(*code),
                ClassItem::Range { from, to } => codes.extend(*from..=*to),
                ClassItem::Class(inner) => codes.extend(inner.raw_codes()),
            }
        }
        codes
    }

    fn digits(negated: bool) -> Self {
        Self {
            negated,
            items: vec![ClassItem::Range { from: 48, to: 57 }],
        }
    }

    fn word(negated: bool) -> Self {
        Self {
            negated,
            items: vec![
                ClassItem::Range { from: 97, to: 122 },
                ClassItem::Range { from: 65, to: 90 },
                ClassItem::Range { from: 48, to: 57 },
                ClassItem::Char(95),
            ],
        }
    }

    fn whitespace(negated: bool) -> Self {
        Self {
            negated,
            items: vec![ClassItem::Range { from: 9, to: 13 }, ClassItem::Char(32)],
        }
    }

    /// `.` matches anything except line terminators.
    fn any_char() -> Self {
        Self {
            negated: true,
            items: vec![
                ClassItem::Char(10),
                ClassItem::Char(13),
                ClassItem::Char(0x2028),
                ClassItem::Char(0x2029),
            ],
        }
    }
}

/// Error returned when pattern tokenization fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pattern error at position {position}: {message}")]
#[non_exhaustive]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Character offset in the input where the error occurred.
    pub position: usize,
}

/// Parses a pattern string into a token tree.
///
/// The returned token is always a [`Token::Group`] holding the root's
/// alternation branches; capture groups inside it are numbered 1-based in
/// opening-parenthesis order.
///
/// # Errors
///
/// Returns [`ParseError`] if the pattern string is malformed (unbalanced
/// groups or classes, bad quantifier bounds, trailing escape).
///
/// # Examples
///
/// ```
/// use sci_coverage::pattern::parser::{parse, Token};
///
/// let root = parse("O(S|M)C").unwrap();
/// let Token::Group(root) = root else { unreachable!() };
/// assert_eq!(root.branches.len(), 1);
/// assert_eq!(root.branches[0].len(), 3);
/// ```
pub fn parse(pattern: &str) -> Result<Token, ParseError> {
    let mut parser = Parser::new(pattern);
    let branches = parser.parse_alternation()?;
    if let Some(ch) = parser.peek() {
        return Err(parser.error(format!("unexpected '{ch}'")));
    }
    Ok(Token::Group(Group {
        kind: GroupKind::NonCapture,
        index: None,
        branches,
    }))
}

struct Parser {
    input: Vec<char>,
    pos: usize,
    next_capture: usize,
}

impl Parser {
    fn new(pattern: &str) -> Self {
        Self {
            input: pattern.chars().collect(),
            pos: 0,
            next_capture: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{expected}', got '{ch}'"))),
            None => Err(self.error(format!("expected '{expected}', got end of pattern"))),
        }
    }

    fn error(&self, message: impl fmt::Display) -> ParseError {
        ParseError {
            message: message.to_string(),
            position: self.pos,
        }
    }

    fn parse_alternation(&mut self) -> Result<Vec<Vec<Token>>, ParseError> {
        let mut branches = vec![self.parse_sequence()?];
        while self.peek() == Some('|') {
            self.advance();
            branches.push(self.parse_sequence()?);
        }
        Ok(branches)
    }

    fn parse_sequence(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            if ch == '|' || ch == ')' {
                break;
            }
            tokens.push(self.parse_quantified()?);
        }
        Ok(tokens)
    }

    /// Parses an atom followed by any number of stacked quantifiers.
    ///
    /// Stacking produces nested repetitions: `a+?` becomes a `{0,1}`
    /// repetition wrapping the `{1,}` repetition of `a`.
    fn parse_quantified(&mut self) -> Result<Token, ParseError> {
        let mut token = self.parse_atom()?;
        loop {
            let (min, max) = match self.peek() {
                Some('*') => (0, None),
                Some('+') => (1, None),
                Some('?') => (0, Some(1)),
                Some('{') => {
                    let bounds = self.parse_bounds()?;
                    token = Token::Repetition(Repetition {
                        min: bounds.0,
                        max: bounds.1,
                        inner: Box::new(token),
                    });
                    continue;
                }
                _ => break,
            };
            self.advance();
            token = Token::Repetition(Repetition {
                min,
                max,
                inner: Box::new(token),
            });
        }
        Ok(token)
    }

    fn parse_atom(&mut self) -> Result<Token, ParseError> {
        match self.peek() {
            Some('(') => self.parse_group(),
            Some('[') => self.parse_class(),
            Some('\\') => self.parse_escape(),
            Some('.') => {
                self.advance();
                Ok(Token::Set(CharClass::any_char()))
            }
            Some('^') => {
                self.advance();
                Ok(Token::Anchor(Anchor::Start))
            }
            Some('$') => {
                self.advance();
                Ok(Token::Anchor(Anchor::End))
            }
            Some(ch @ ('*' | '+' | '?')) => Err(self.error(format!("nothing to repeat at '{ch}'"))),
            Some(ch) => {
                self.advance();
                Ok(Token::Char(ch as u32))
            }
            None => Err(self.error("unexpected end of pattern")),
        }
    }

    fn parse_group(&mut self) -> Result<Token, ParseError> {
        self.expect('(')?;
        let kind = self.parse_group_kind()?;
        let index = if kind == GroupKind::Capture {
            let index = self.next_capture;
            self.next_capture += 1;
            Some(index)
        } else {
            None
        };
        let branches = self.parse_alternation()?;
        self.expect(')')?;
        Ok(Token::Group(Group {
            kind,
            index,
            branches,
        }))
    }

    fn parse_group_kind(&mut self) -> Result<GroupKind, ParseError> {
        if self.peek() != Some('?') {
            return Ok(GroupKind::Capture);
        }
        match self.peek_at(1) {
            Some(':') => {
                self.pos += 2;
                Ok(GroupKind::NonCapture)
            }
            Some('=') => {
                self.pos += 2;
                Ok(GroupKind::PositiveLookahead)
            }
            Some('!') => {
                self.pos += 2;
                Ok(GroupKind::NegativeLookahead)
            }
            Some('<') => {
                // (?<= and (?<! both land here; consume the assertion marker
                // so the body still parses and the tree carries the node.
                self.pos += 2;
                if matches!(self.peek(), Some('=' | '!')) {
                    self.advance();
                }
                Ok(GroupKind::Lookbehind)
            }
            Some(ch) => Err(self.error(format!("unknown group modifier '?{ch}'"))),
            None => Err(self.error("unexpected end of pattern after '(?'")),
        }
    }

    fn parse_escape(&mut self) -> Result<Token, ParseError> {
        self.expect('\\')?;
        let Some(ch) = self.advance() else {
            return Err(self.error("trailing '\\' at end of pattern"));
        };
        let token = match ch {
            'd' => Token::Set(CharClass::digits(false)),
            'D' => Token::Set(CharClass::digits(true)),
            'w' => Token::Set(CharClass::word(false)),
            'W' => Token::Set(CharClass::word(true)),
            's' => Token::Set(CharClass::whitespace(false)),
            'S' => Token::Set(CharClass::whitespace(true)),
            'b' => Token::Anchor(Anchor::WordBoundary),
            'B' => Token::Anchor(Anchor::NonWordBoundary),
            '1'..='9' => Token::Reference(ch as usize - '0' as usize),
            other => Token::Char(escaped_code(other)),
        };
        Ok(token)
    }

    fn parse_class(&mut self) -> Result<Token, ParseError> {
        self.expect('[')?;
        let negated = if self.peek() == Some('^') {
            self.advance();
            true
        } else {
            false
        };
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated character class")),
                Some(']') => {
                    self.advance();
                    break;
                }
                Some(_) => items.push(self.parse_class_item()?),
            }
        }
        Ok(Token::Set(CharClass { negated, items }))
    }

    fn parse_class_item(&mut self) -> Result<ClassItem, ParseError> {
        let start = match self.advance() {
            Some('\\') => match self.advance() {
                Some('d') => return Ok(ClassItem::Class(CharClass::digits(false))),
                Some('D') => return Ok(ClassItem::Class(CharClass::digits(true))),
                Some('w') => return Ok(ClassItem::Class(CharClass::word(false))),
                Some('W') => return Ok(ClassItem::Class(CharClass::word(true))),
                Some('s') => return Ok(ClassItem::Class(CharClass::whitespace(false))),
                Some('S') => return Ok(ClassItem::Class(CharClass::whitespace(true))),
                Some(other) => escaped_code(other),
                None => return Err(self.error("trailing '\\' in character class")),
            },
            Some(ch) => ch as u32,
            None => return Err(self.error("unterminated character class")),
        };

        // A '-' forms a range unless it sits just before the closing bracket.
        if self.peek() == Some('-') && self.peek_at(1).is_some_and(|ch| ch != ']') {
            self.advance();
            let end = match self.advance() {
                Some('\\') => match self.advance() {
                    Some(other) => escaped_code(other),
                    None => return Err(self.error("trailing '\\' in character class")),
                },
                Some(ch) => ch as u32,
                None => return Err(self.error("unterminated character class")),
            };
            if end < start {
                return Err(self.error("character range out of order"));
            }
            return Ok(ClassItem::Range {
                from: start,
                to: end,
            });
        }

        Ok(ClassItem::Char(start))
    }

    /// Parses `{m}`, `{m,}` or `{m,n}` bounds; the opening brace is peeked by
    /// the caller.
    fn parse_bounds(&mut self) -> Result<(u32, Option<u32>), ParseError> {
        self.expect('{')?;
        let min = self.parse_number()?;
        let max = match self.peek() {
            Some('}') => Some(min),
            Some(',') => {
                self.advance();
                if self.peek() == Some('}') {
                    None
                } else {
                    Some(self.parse_number()?)
                }
            }
            _ => return Err(self.error("expected ',' or '}' in quantifier bounds")),
        };
        self.expect('}')?;
        if let Some(max) = max {
            if max < min {
                return Err(self.error("quantifier bounds out of order"));
            }
        }
        Ok((min, max))
    }

    fn parse_number(&mut self) -> Result<u32, ParseError> {
        let start = self.pos;
        let mut value: u32 = 0;
        let mut digits = 0;
        while let Some(ch) = self.peek() {
            let Some(digit) = ch.to_digit(10) else { break };
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| ParseError {
                    message: "number overflow in quantifier bounds".to_string(),
                    position: start,
                })?;
            digits += 1;
            self.advance();
        }
        if digits == 0 {
            return Err(self.error("expected number"));
        }
        Ok(value)
    }
}

/// Code for an escaped literal character (`\n`, `\t`, `\-`, ...).
const fn escaped_code(ch: char) -> u32 {
    match ch {
        'n' => 10,
        'r' => 13,
        't' => 9,
        'f' => 12,
        'v' => 11,
        '0' => 0,
        other => other as u32,
    }
}
