//! Shared vocabulary for the formula engine.
//!
//! Every pipeline stage (lexer, preprocessor, validator, tree builder,
//! evaluator) speaks in terms of the types defined here:
//!
//! ```text
//! source text ──► Token (Item + Span) ──► tree of Items ──► f64
//! ```
//!
//! The crate also owns the built-in operation/constant tables and the
//! resolvers that map textual signs onto them. Resolvers are plain values:
//! each parser instance owns its own, so registering custom signs is
//! instance-scoped rather than process-global.

pub mod builtin;
mod item;
mod operation;
mod resolver;
mod span;
mod token;

pub use item::{Item, ARGUMENT_PRIORITY};
pub use operation::{Notation, OpKind, Operation, MAX_PRIORITY, MIN_PRIORITY, MIN_UNARY_PRIORITY};
pub use resolver::{ConstantResolver, OperationResolver};
pub use span::Span;
pub use token::Token;
