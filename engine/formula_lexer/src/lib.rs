//! Tokenizer for the formula engine.
//!
//! Scans the source string left to right and produces an ordered token
//! sequence. At each position, after skipping whitespace, a fixed cascade
//! of recognizers runs: digit literal, constant sign, operation sign,
//! variable, bracket. Each recognizer either matches a prefix starting at
//! the cursor or reports no match; exhausting the cascade is the only lex
//! failure, reported with the offset of the position.
//!
//! Sign recognizers probe progressively longer substrings against the
//! resolvers, bounded by the longest registered sign, and keep the longest
//! hit - a sign that is a strict prefix of a longer registered sign never
//! shadows it. Constants additionally refuse a match that is immediately
//! followed by a letter, so `pi` does not lex out of `pix`.

mod lex_error;

use std::sync::Arc;

use formula_ir::{ConstantResolver, Item, OperationResolver, Span, Token};

pub use lex_error::LexError;

/// Split a formula string into tokens.
///
/// Whitespace produces no token; output order preserves source order.
///
/// # Errors
/// Returns a [`LexError`] carrying the offset of the first position where
/// no recognizer matches.
pub fn tokenize(
    source: &str,
    constants: &ConstantResolver,
    operations: &OperationResolver,
) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < source.len() {
        let rest = &source[pos..];
        let Some(first) = rest.chars().next() else {
            break;
        };
        if first.is_whitespace() {
            pos += first.len_utf8();
            continue;
        }
        match next_token(rest, constants, operations) {
            Some((item, len)) => {
                tokens.push(Token::new(item, Span::from_range(pos..pos + len)));
                pos += len;
            }
            None => {
                return Err(LexError::unrecognized(Span::from_range(
                    pos..pos + first.len_utf8(),
                )));
            }
        }
    }
    Ok(tokens)
}

/// Run the recognizer cascade at the start of `rest`.
///
/// Returns the matched item and its length in bytes.
fn next_token(
    rest: &str,
    constants: &ConstantResolver,
    operations: &OperationResolver,
) -> Option<(Item, usize)> {
    scan_digit(rest)
        .or_else(|| scan_constant(rest, constants))
        .or_else(|| scan_operation(rest, operations))
        .or_else(|| scan_variable(rest))
        .or_else(|| scan_bracket(rest))
}

/// Digit literal: ASCII digits with at most one decimal point.
///
/// A second decimal point makes the whole literal a non-match, which
/// surfaces as a lex error once the rest of the cascade fails too.
fn scan_digit(rest: &str) -> Option<(Item, usize)> {
    if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let mut len = 0;
    let mut seen_dot = false;
    for ch in rest.chars() {
        match ch {
            '0'..='9' => len += 1,
            '.' if !seen_dot => {
                seen_dot = true;
                len += 1;
            }
            '.' => return None,
            _ => break,
        }
    }
    let value: f64 = rest[..len].parse().ok()?;
    Some((Item::Digit(value), len))
}

/// Constant sign; the matched constant is folded to a digit item.
fn scan_constant(rest: &str, constants: &ConstantResolver) -> Option<(Item, usize)> {
    scan_sign(rest, constants.max_sign_len(), true, |candidate| {
        constants.find(candidate).map(Item::Digit)
    })
}

/// Operation sign.
fn scan_operation(rest: &str, operations: &OperationResolver) -> Option<(Item, usize)> {
    scan_sign(rest, operations.max_sign_len(), false, |candidate| {
        operations
            .find(candidate)
            .map(|op| Item::Operation(Arc::clone(op)))
    })
}

/// Greedy sign probe: try every candidate length up to `max_len` characters
/// and keep the longest one the lookup accepts.
///
/// With `reject_letter_follow`, a candidate whose next source character is
/// alphabetic is skipped - it would split an identifier the table does not
/// know in full.
fn scan_sign(
    rest: &str,
    max_len: usize,
    reject_letter_follow: bool,
    lookup: impl Fn(&str) -> Option<Item>,
) -> Option<(Item, usize)> {
    let mut best = None;
    for (count, (idx, ch)) in rest.char_indices().enumerate() {
        if count == max_len {
            break;
        }
        let end = idx + ch.len_utf8();
        if let Some(item) = lookup(&rest[..end]) {
            if reject_letter_follow && rest[end..].starts_with(char::is_alphabetic) {
                continue;
            }
            best = Some((item, end));
        }
    }
    best
}

/// Variable: a single letter not immediately followed by another letter or
/// digit. End of input counts as a valid follower.
fn scan_variable(rest: &str) -> Option<(Item, usize)> {
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_alphabetic() {
        return None;
    }
    match chars.next() {
        Some(c) if c.is_alphanumeric() => None,
        _ => Some((Item::Variable(first), first.len_utf8())),
    }
}

/// Literal `(` or `)`.
fn scan_bracket(rest: &str) -> Option<(Item, usize)> {
    match rest.as_bytes().first() {
        Some(b'(') => Some((Item::OpenBracket, 1)),
        Some(b')') => Some((Item::CloseBracket, 1)),
        _ => None,
    }
}
