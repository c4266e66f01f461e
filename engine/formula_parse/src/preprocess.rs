//! Token rewriting ahead of validation and tree building.
//!
//! Two rules run in a fixed order. Insertion points are collected before
//! the sequence is touched, so indices stay valid while scanning.
//!
//! **Negation normalization** - subtraction is not a binary operation here:
//! `-` lexes as prefix negation, and a binary `+` is inserted in front of it
//! whenever it follows a completed operand. `7 - 2 - 3` therefore builds
//! the same tree as `7 + -2 + -3`, and no separate subtraction precedence
//! exists.
//!
//! **Implicit multiplication** - a digit textually glued to a variable or
//! an open bracket, or a variable glued to an open bracket, gets an explicit
//! `*` between them: `3x` becomes `3*x`, `x(` becomes `x*(`. Tokens merely
//! adjacent in the token sequence but separated by whitespace in the source
//! are left alone; `3 y` stays missing its operation.

use std::sync::Arc;

use formula_ir::{builtin, Item, Span, Token};

/// Apply both rewrite rules in order.
pub fn preprocess(tokens: Vec<Token>) -> Vec<Token> {
    let tokens = normalize_negation(tokens);
    insert_implicit_multiplication(tokens)
}

/// A prefix unary operation answering to the `-` sign.
fn is_negation(item: &Item) -> bool {
    item.is_prefix_unary() && item.operation().is_some_and(|op| op.has_sign("-"))
}

/// Insert binary `+` before every negation that follows a completed
/// operand: an argument, a close bracket, or a postfix unary operation.
fn normalize_negation(tokens: Vec<Token>) -> Vec<Token> {
    let mut inserts = Vec::new();
    for i in 1..tokens.len() {
        if !is_negation(&tokens[i].item) {
            continue;
        }
        let prev = &tokens[i - 1].item;
        if prev.is_argument() || prev.is_close_bracket() || prev.is_postfix_unary() {
            inserts.push(i);
        }
    }
    apply_inserts(tokens, &inserts, || {
        Item::Operation(Arc::new(builtin::addition()))
    })
}

/// Insert binary `*` into textually-glued argument/bracket adjacencies.
fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    let mut inserts = Vec::new();
    for i in 0..tokens.len().saturating_sub(1) {
        let (first, second) = (&tokens[i], &tokens[i + 1]);
        // Whitespace between the tokens means the adjacency is not an
        // implicit multiplication; the validator will point at it.
        if first.span.end != second.span.start {
            continue;
        }
        let digit_then = matches!(first.item, Item::Digit(_))
            && (matches!(second.item, Item::Variable(_)) || second.item.is_open_bracket());
        let variable_then =
            matches!(first.item, Item::Variable(_)) && second.item.is_open_bracket();
        if digit_then || variable_then {
            inserts.push(i + 1);
        }
    }
    apply_inserts(tokens, &inserts, || {
        Item::Operation(Arc::new(builtin::multiplication()))
    })
}

/// Rebuild the sequence with `make()` items inserted before the recorded
/// indices. Inserted tokens carry a zero-length span at the displaced
/// token's offset.
fn apply_inserts(tokens: Vec<Token>, at: &[usize], make: impl Fn() -> Item) -> Vec<Token> {
    if at.is_empty() {
        return tokens;
    }
    let mut out = Vec::with_capacity(tokens.len() + at.len());
    let mut pending = at.iter().copied().peekable();
    for (i, token) in tokens.into_iter().enumerate() {
        if pending.peek() == Some(&i) {
            pending.next();
            out.push(Token::new(make(), Span::point(token.span.start)));
        }
        out.push(token);
    }
    out
}
