//! Evaluation and binding error types.
//!
//! Two separate enums so callers can tell a configuration mistake (binding
//! a name the formula does not contain) apart from a calculation-time
//! failure (evaluating with a name still unbound).

/// A variable referenced by the tree has no bound value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EvalError {
    UnboundVariable { name: char },
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::UnboundVariable { name } => {
                write!(f, "no mapped value for variable '{name}'")
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// A binding was attempted for a name the formula does not contain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BindingError {
    UnknownVariable { name: char },
}

impl std::fmt::Display for BindingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingError::UnknownVariable { name } => {
                write!(f, "variable '{name}' is absent in formula")
            }
        }
    }
}

impl std::error::Error for BindingError {}
