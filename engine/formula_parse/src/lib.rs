//! Middle stages of the formula pipeline: token rewriting, structural
//! validation, and tree building.
//!
//! ```text
//! Vec<Token> ──► preprocess ──► validate ──► build ──► FormulaTree
//! ```
//!
//! The stages are deliberately separate functions over the token sequence:
//! the preprocessor makes implicit operations explicit, the validator
//! establishes every assumption the builder relies on, and the builder is
//! therefore infallible.

mod error;
mod preprocess;
mod tree;
mod validate;

pub use error::{ValidationError, ValidationErrorKind};
pub use preprocess::preprocess;
pub use tree::{build, FormulaTree, NodeId};
pub use validate::validate;
