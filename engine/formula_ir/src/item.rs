//! Structural elements of a formula.

use std::fmt;
use std::sync::Arc;

use crate::operation::{Notation, Operation};

/// Priority reported by argument items.
///
/// Digits and variables are always tree leaves, so they report a priority
/// above every operation; the tree builder's downward walk stops at them.
pub const ARGUMENT_PRIORITY: u8 = u8::MAX;

/// One structural element of a formula.
///
/// Items are what tokens carry and what tree nodes wrap; the pipeline never
/// looks back at the source text once items exist.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    /// An operation, shared with the resolver that produced it.
    Operation(Arc<Operation>),
    /// A digit literal (constants are folded to their value at lex time).
    Digit(f64),
    /// A single-letter variable.
    Variable(char),
    OpenBracket,
    CloseBracket,
}

impl Item {
    /// Priority of this item, if it participates in priority ordering.
    ///
    /// Operations report their declared priority, arguments report
    /// [`ARGUMENT_PRIORITY`], brackets report nothing - they reset the
    /// ordering instead of taking part in it.
    pub fn priority(&self) -> Option<u8> {
        match self {
            Item::Operation(op) => Some(op.priority()),
            Item::Digit(_) | Item::Variable(_) => Some(ARGUMENT_PRIORITY),
            Item::OpenBracket | Item::CloseBracket => None,
        }
    }

    /// The wrapped operation, if any.
    pub fn operation(&self) -> Option<&Arc<Operation>> {
        match self {
            Item::Operation(op) => Some(op),
            _ => None,
        }
    }

    /// Check if this is a digit or variable.
    #[inline]
    pub fn is_argument(&self) -> bool {
        matches!(self, Item::Digit(_) | Item::Variable(_))
    }

    /// Check if this is a binary operation.
    pub fn is_binary_operation(&self) -> bool {
        self.operation().is_some_and(|op| op.is_binary())
    }

    /// Check if this is a unary operation.
    pub fn is_unary_operation(&self) -> bool {
        self.operation().is_some_and(|op| op.is_unary())
    }

    /// Check if this is a prefix unary operation.
    pub fn is_prefix_unary(&self) -> bool {
        self.operation()
            .is_some_and(|op| op.notation() == Some(Notation::Prefix))
    }

    /// Check if this is a postfix unary operation.
    pub fn is_postfix_unary(&self) -> bool {
        self.operation()
            .is_some_and(|op| op.notation() == Some(Notation::Postfix))
    }

    #[inline]
    pub fn is_open_bracket(&self) -> bool {
        matches!(self, Item::OpenBracket)
    }

    #[inline]
    pub fn is_close_bracket(&self) -> bool {
        matches!(self, Item::CloseBracket)
    }

    #[inline]
    pub fn is_bracket(&self) -> bool {
        matches!(self, Item::OpenBracket | Item::CloseBracket)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Operation(op) => f.write_str(op.sign()),
            Item::Digit(value) => write!(f, "{value}"),
            Item::Variable(name) => write!(f, "{name}"),
            Item::OpenBracket => f.write_str("("),
            Item::CloseBracket => f.write_str(")"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use pretty_assertions::assert_eq;

    #[test]
    fn argument_items_report_maximal_priority() {
        assert_eq!(Item::Digit(3.5).priority(), Some(ARGUMENT_PRIORITY));
        assert_eq!(Item::Variable('x').priority(), Some(ARGUMENT_PRIORITY));
    }

    #[test]
    fn brackets_have_no_priority() {
        assert_eq!(Item::OpenBracket.priority(), None);
        assert_eq!(Item::CloseBracket.priority(), None);
        assert!(Item::OpenBracket.is_bracket());
        assert!(!Item::OpenBracket.is_argument());
    }

    #[test]
    fn operation_items_report_declared_priority() {
        let item = Item::Operation(Arc::new(builtin::multiplication()));
        assert_eq!(item.priority(), Some(1));
        assert!(item.is_binary_operation());
        assert!(!item.is_unary_operation());
    }

    #[test]
    fn notation_classification() {
        let minus = Item::Operation(Arc::new(builtin::negation()));
        let bang = Item::Operation(Arc::new(builtin::factorial_op()));
        assert!(minus.is_prefix_unary());
        assert!(!minus.is_postfix_unary());
        assert!(bang.is_postfix_unary());
        assert!(!Item::Digit(1.0).is_prefix_unary());
    }

    #[test]
    fn display_names_the_element() {
        assert_eq!(Item::Variable('y').to_string(), "y");
        assert_eq!(Item::Digit(2.5).to_string(), "2.5");
        assert_eq!(
            Item::Operation(Arc::new(builtin::addition())).to_string(),
            "+"
        );
        assert_eq!(Item::CloseBracket.to_string(), ")");
    }
}
