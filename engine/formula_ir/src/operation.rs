//! Operation descriptors.
//!
//! An [`Operation`] is an immutable description of one mathematical
//! operator: its sign aliases, its precedence priority, and its compute
//! function. Built-ins and caller-registered customs share the same
//! descriptor type; there is no separate extension trait.

use std::fmt;

/// Lowest operation priority.
pub const MIN_PRIORITY: u8 = 0;

/// Highest operation priority.
pub const MAX_PRIORITY: u8 = 10;

/// Default priority for unary operations.
///
/// Unary operators bind tighter than every built-in binary operator, so the
/// rewrite of `a - b` into `a + -b` keeps the negation attached to its
/// operand.
pub const MIN_UNARY_PRIORITY: u8 = 5;

/// Where a unary operator's operand appears relative to its sign.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Notation {
    /// Operand follows the sign: `sin x`, `-x`.
    Prefix,
    /// Operand precedes the sign: `x!`.
    Postfix,
}

/// Arity, notation, and compute function of an operation.
///
/// Plain function pointers keep descriptors cheap to share and need no
/// virtual dispatch.
#[derive(Clone, Copy)]
pub enum OpKind {
    /// Operation over one operand.
    Unary {
        notation: Notation,
        apply: fn(f64) -> f64,
    },
    /// Operation over two operands.
    Binary { apply: fn(f64, f64) -> f64 },
}

/// Immutable operation descriptor.
#[derive(Clone)]
pub struct Operation {
    signs: Vec<String>,
    priority: u8,
    kind: OpKind,
}

impl Operation {
    /// Create a unary operation.
    ///
    /// # Panics
    /// Panics if `priority` exceeds [`MAX_PRIORITY`], or if `signs` is empty
    /// or contains an empty sign - all of these are caller bugs.
    pub fn unary(notation: Notation, priority: u8, signs: &[&str], apply: fn(f64) -> f64) -> Self {
        Self::with_kind(priority, signs, OpKind::Unary { notation, apply })
    }

    /// Create a binary operation.
    ///
    /// # Panics
    /// Panics if `priority` exceeds [`MAX_PRIORITY`], or if `signs` is empty
    /// or contains an empty sign.
    pub fn binary(priority: u8, signs: &[&str], apply: fn(f64, f64) -> f64) -> Self {
        Self::with_kind(priority, signs, OpKind::Binary { apply })
    }

    fn with_kind(priority: u8, signs: &[&str], kind: OpKind) -> Self {
        assert!(
            priority <= MAX_PRIORITY,
            "operation priority {priority} exceeds maximum {MAX_PRIORITY}"
        );
        assert!(!signs.is_empty(), "operation must declare at least one sign");
        assert!(
            signs.iter().all(|s| !s.is_empty()),
            "operation signs must be non-empty"
        );
        Operation {
            signs: signs.iter().map(ToString::to_string).collect(),
            priority,
            kind,
        }
    }

    /// Precedence priority; higher binds tighter.
    #[inline]
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// All sign aliases of this operation.
    #[inline]
    pub fn signs(&self) -> &[String] {
        &self.signs
    }

    /// The primary (first-declared) sign.
    #[inline]
    pub fn sign(&self) -> &str {
        &self.signs[0]
    }

    /// Check whether `sign` is one of this operation's aliases.
    pub fn has_sign(&self, sign: &str) -> bool {
        self.signs.iter().any(|s| s == sign)
    }

    /// Arity, notation, and compute function.
    #[inline]
    pub fn kind(&self) -> &OpKind {
        &self.kind
    }

    /// The unary notation, if this is a unary operation.
    pub fn notation(&self) -> Option<Notation> {
        match self.kind {
            OpKind::Unary { notation, .. } => Some(notation),
            OpKind::Binary { .. } => None,
        }
    }

    /// Check if this is a unary operation.
    pub fn is_unary(&self) -> bool {
        matches!(self.kind, OpKind::Unary { .. })
    }

    /// Check if this is a binary operation.
    pub fn is_binary(&self) -> bool {
        matches!(self.kind, OpKind::Binary { .. })
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arity = match self.kind {
            OpKind::Unary { notation, .. } => format!("unary/{notation:?}"),
            OpKind::Binary { .. } => "binary".to_string(),
        };
        f.debug_struct("Operation")
            .field("sign", &self.sign())
            .field("priority", &self.priority)
            .field("arity", &arity)
            .finish()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sign())
    }
}

/// Descriptor equality: same signs, priority, arity, and notation.
///
/// Compute functions are not compared; two descriptors that agree on
/// everything observable to the parser are interchangeable.
impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
            && self.signs == other.signs
            && match (&self.kind, &other.kind) {
                (OpKind::Unary { notation: a, .. }, OpKind::Unary { notation: b, .. }) => a == b,
                (OpKind::Binary { .. }, OpKind::Binary { .. }) => true,
                _ => false,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn double(x: f64) -> f64 {
        x * 2.0
    }

    fn add(a: f64, b: f64) -> f64 {
        a + b
    }

    #[test]
    fn unary_descriptor() {
        let op = Operation::unary(Notation::Prefix, 5, &["dbl"], double);
        assert!(op.is_unary());
        assert!(!op.is_binary());
        assert_eq!(op.notation(), Some(Notation::Prefix));
        assert_eq!(op.priority(), 5);
        assert_eq!(op.sign(), "dbl");
    }

    #[test]
    fn binary_descriptor() {
        let op = Operation::binary(1, &["&", "and"], add);
        assert!(op.is_binary());
        assert_eq!(op.notation(), None);
        assert_eq!(op.signs(), &["&".to_string(), "and".to_string()]);
        assert!(op.has_sign("and"));
        assert!(!op.has_sign("or"));
    }

    #[test]
    fn display_uses_primary_sign() {
        let op = Operation::binary(0, &["+", "plus"], add);
        assert_eq!(format!("{op}"), "+");
    }

    #[test]
    #[should_panic(expected = "exceeds maximum")]
    fn priority_out_of_bounds_panics() {
        let _ = Operation::binary(11, &["?"], add);
    }

    #[test]
    #[should_panic(expected = "at least one sign")]
    fn missing_signs_panic() {
        let _ = Operation::binary(0, &[], add);
    }

    #[test]
    fn equality_ignores_compute_function() {
        let a = Operation::unary(Notation::Prefix, 5, &["f"], double);
        let b = Operation::unary(Notation::Prefix, 5, &["f"], f64::sqrt);
        let c = Operation::unary(Notation::Postfix, 5, &["f"], double);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
