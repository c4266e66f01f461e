//! Structural validation of the rewritten token sequence.
//!
//! Four rules run in a fixed order; the first violation wins and is
//! reported with the offending token's span. Everything the tree builder
//! assumes about its input is established here - construction itself can
//! no longer fail.

use formula_ir::{Item, Token};

use crate::error::ValidationError;

/// Check a rewritten token sequence against all structural rules.
///
/// # Errors
/// Returns the first rule violation, pointing at the offending token.
pub fn validate(tokens: &[Token]) -> Result<(), ValidationError> {
    check_brackets(tokens)?;
    check_adjacency(tokens)?;
    check_binary_operands(tokens)?;
    check_unary_operands(tokens)
}

/// Every close bracket needs an earlier open bracket, and every open
/// bracket a later close: `()` nests, `)(` does not.
fn check_brackets(tokens: &[Token]) -> Result<(), ValidationError> {
    let mut open = Vec::new();
    for token in tokens {
        match token.item {
            Item::OpenBracket => open.push(token),
            Item::CloseBracket => {
                if open.pop().is_none() {
                    return Err(ValidationError::stray_close_bracket(token.span));
                }
            }
            _ => {}
        }
    }
    match open.last() {
        Some(unmatched) => Err(ValidationError::unmatched_open_bracket(unmatched.span)),
        None => Ok(()),
    }
}

/// Adjacent pairs that imply a missing operation (or an empty bracket
/// pair). Implicit multiplication has already been made explicit, so any
/// surviving argument/bracket adjacency is an error.
fn check_adjacency(tokens: &[Token]) -> Result<(), ValidationError> {
    for pair in tokens.windows(2) {
        let (first, second) = (&pair[0].item, &pair[1].item);
        if first.is_open_bracket() && second.is_close_bracket() {
            return Err(ValidationError::empty_brackets(pair[0].span));
        }
        let missing = (first.is_argument() && second.is_argument())
            || (first.is_argument() && second.is_open_bracket())
            || (first.is_close_bracket() && second.is_argument())
            || (first.is_argument() && second.is_prefix_unary())
            || (first.is_postfix_unary() && second.is_prefix_unary())
            || (first.is_close_bracket() && second.is_open_bracket());
        if missing {
            return Err(ValidationError::missing_operation(pair[1].span, second));
        }
    }
    Ok(())
}

fn is_valid_left_operand(item: &Item) -> bool {
    item.is_argument() || item.is_close_bracket() || item.is_postfix_unary()
}

fn is_valid_right_operand(item: &Item) -> bool {
    item.is_argument() || item.is_open_bracket() || item.is_prefix_unary()
}

/// Every binary operation needs a valid operand on both sides; a binary
/// operation at either end of the sequence has none.
fn check_binary_operands(tokens: &[Token]) -> Result<(), ValidationError> {
    for (i, token) in tokens.iter().enumerate() {
        let Some(op) = token.item.operation().filter(|op| op.is_binary()) else {
            continue;
        };
        let left_ok = i
            .checked_sub(1)
            .is_some_and(|prev| is_valid_left_operand(&tokens[prev].item));
        let right_ok = tokens
            .get(i + 1)
            .is_some_and(|next| is_valid_right_operand(&next.item));
        if !left_ok || !right_ok {
            return Err(ValidationError::invalid_binary_operand(
                token.span,
                op.sign(),
            ));
        }
    }
    Ok(())
}

/// Every prefix unary operation needs a following operand (argument, open
/// bracket, or a further prefix operation - stacked negations nest); every
/// postfix one needs a preceding operand (argument or close bracket).
fn check_unary_operands(tokens: &[Token]) -> Result<(), ValidationError> {
    for (i, token) in tokens.iter().enumerate() {
        let Some(op) = token.item.operation().filter(|op| op.is_unary()) else {
            continue;
        };
        let ok = if token.item.is_prefix_unary() {
            tokens.get(i + 1).is_some_and(|next| {
                next.item.is_argument() || next.item.is_open_bracket() || next.item.is_prefix_unary()
            })
        } else {
            i.checked_sub(1).is_some_and(|prev| {
                let prev = &tokens[prev].item;
                prev.is_argument() || prev.is_close_bracket()
            })
        };
        if !ok {
            return Err(ValidationError::invalid_unary_operand(token.span, op.sign()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;
    use crate::preprocess::preprocess;
    use formula_ir::{ConstantResolver, OperationResolver};
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> Vec<Token> {
        formula_lexer::tokenize(
            source,
            &ConstantResolver::default(),
            &OperationResolver::default(),
        )
        .unwrap()
    }

    fn check(source: &str) -> Result<(), ValidationError> {
        validate(&preprocess(lex(source)))
    }

    fn kind(source: &str) -> ValidationErrorKind {
        check(source).unwrap_err().kind
    }

    #[test]
    fn well_formed_formulas_pass() {
        for source in [
            "3 * y",
            "3 * (y)",
            "sin(x) - 1",
            "x! - 1",
            "7--2",
            "-x + 2",
            "(x + y) / (2 - 10) * x",
            "3x + x(x + 1)",
        ] {
            assert_eq!(check(source), Ok(()), "expected {source:?} to validate");
        }
    }

    #[test]
    fn stray_close_bracket() {
        let err = check("(1) )(").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::StrayCloseBracket);
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn unmatched_open_bracket() {
        let err = check("(x").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnmatchedOpenBracket);
        assert_eq!(err.offset(), 0);
        assert!(matches!(
            kind("(1 + (2)"),
            ValidationErrorKind::UnmatchedOpenBracket
        ));
    }

    #[test]
    fn empty_brackets() {
        assert_eq!(kind("()"), ValidationErrorKind::EmptyBrackets);
        assert_eq!(kind("sin()"), ValidationErrorKind::EmptyBrackets);
    }

    #[test]
    fn spaced_arguments_are_missing_an_operation() {
        assert!(matches!(
            kind("3 y"),
            ValidationErrorKind::MissingOperation { .. }
        ));
        assert!(matches!(
            kind("3x y"),
            ValidationErrorKind::MissingOperation { .. }
        ));
    }

    #[test]
    fn spaced_bracket_needs_an_operation() {
        assert!(matches!(
            kind("3 (y)"),
            ValidationErrorKind::MissingOperation { .. }
        ));
    }

    #[test]
    fn bracket_groups_need_an_operation_between_them() {
        assert!(matches!(
            kind("(x)(y)"),
            ValidationErrorKind::MissingOperation { .. }
        ));
    }

    #[test]
    fn binary_operation_missing_an_operand() {
        for source in ["2 +", "+ x", "2 + )", "2 + *", "( + x", "* + x", "+"] {
            assert!(
                matches!(
                    check(source).unwrap_err().kind,
                    ValidationErrorKind::InvalidBinaryOperand { .. }
                        | ValidationErrorKind::StrayCloseBracket
                        | ValidationErrorKind::UnmatchedOpenBracket
                ),
                "expected {source:?} to fail"
            );
        }
    }

    #[test]
    fn trailing_binary_operation_is_rejected() {
        let err = check("x*2+").unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::InvalidBinaryOperand { sign: "+".into() }
        );
    }

    #[test]
    fn prefix_operation_needs_a_following_operand() {
        assert_eq!(
            kind("1 - sin"),
            ValidationErrorKind::InvalidUnaryOperand { sign: "sin".into() }
        );
        // A prefix operation in postfix position trips the binary rule
        // first: `sin` is no valid left operand for `+`.
        assert_eq!(
            kind("(x)sin + 1"),
            ValidationErrorKind::InvalidBinaryOperand { sign: "+".into() }
        );
    }

    #[test]
    fn postfix_operation_needs_a_preceding_operand() {
        assert!(matches!(
            kind("!x - 1"),
            ValidationErrorKind::InvalidUnaryOperand { .. }
        ));
        assert!(matches!(
            kind("x!! - 1"),
            ValidationErrorKind::InvalidUnaryOperand { .. }
        ));
    }

    #[test]
    fn lone_operations_are_rejected() {
        assert!(check("-").is_err());
        assert!(check("!").is_err());
        assert!(check("sin").is_err());
    }
}
