//! Formula parsing and evaluation.
//!
//! The embeddable surface of the engine: a [`FormulaParser`] owns its sign
//! vocabulary (constants and operations), parses expression strings into
//! [`Formula`] values, and those calculate under caller-supplied variable
//! bindings.
//!
//! ```
//! use formulac::FormulaParser;
//!
//! let parser = FormulaParser::new();
//! let mut formula = parser.parse("x + sin(2) + y/2.5").unwrap();
//! formula.set_variable('x', 1.0).unwrap().set_variable('y', 5.0).unwrap();
//! assert_eq!(formula.calculate().unwrap(), 1.0 + f64::sin(2.0) + 5.0 / 2.5);
//! ```
//!
//! Custom vocabulary is per-parser: registrations on one instance never
//! affect another.
//!
//! ```
//! use formulac::{FormulaParser, Operation};
//!
//! let mut parser = FormulaParser::new();
//! parser
//!     .add_constant("g", 9.81)
//!     .add_operation(Operation::binary(1, &["%", "mod"], |a, b| a % b));
//! assert_eq!(parser.parse("g mod 3").unwrap().calculate().unwrap(), 9.81 % 3.0);
//! ```

use formula_ir::{ConstantResolver, OperationResolver};

pub use formula_eval::{BindingError, EvalError, Formula};
pub use formula_ir::{builtin, Notation, OpKind, Operation, Span};
pub use formula_lexer::LexError;
pub use formula_parse::{ValidationError, ValidationErrorKind};

/// Parser for formulas in string presentation.
///
/// Owns the resolvers mapping textual signs to constants and operations,
/// seeded with the built-in vocabulary. Register custom signs before
/// calling [`parse`](Self::parse); later registrations for an existing sign
/// silently override it.
#[derive(Clone, Debug, Default)]
pub struct FormulaParser {
    constants: ConstantResolver,
    operations: OperationResolver,
}

impl FormulaParser {
    /// Create a parser with the built-in constants and operations.
    pub fn new() -> Self {
        FormulaParser::default()
    }

    /// Register a constant, chainable. An existing sign is overridden.
    pub fn add_constant(&mut self, sign: &str, value: f64) -> &mut Self {
        self.constants.register(sign, value);
        self
    }

    /// Register an operation under each of its signs, chainable.
    pub fn add_operation(&mut self, operation: Operation) -> &mut Self {
        self.operations.register(operation);
        self
    }

    /// The `(sign, value)` pairs this parser currently resolves.
    pub fn supported_constants(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.constants.entries()
    }

    /// The `(sign, operation)` pairs this parser currently resolves.
    pub fn supported_operations(
        &self,
    ) -> impl Iterator<Item = (&str, &std::sync::Arc<Operation>)> + '_ {
        self.operations.entries()
    }

    /// Parse a formula string.
    ///
    /// Runs the full pipeline: tokenize, rewrite, validate, build. A failed
    /// parse returns no formula and leaves no state behind.
    ///
    /// # Errors
    /// [`ParseError::EmptyFormula`] for empty (or all-whitespace) input,
    /// [`ParseError::Lex`] for an unrecognized character sequence, and
    /// [`ParseError::Invalid`] for a structurally invalid formula.
    pub fn parse(&self, text: &str) -> Result<Formula, ParseError> {
        if text.is_empty() {
            return Err(ParseError::EmptyFormula);
        }
        let tokens = formula_lexer::tokenize(text, &self.constants, &self.operations)?;
        if tokens.is_empty() {
            return Err(ParseError::EmptyFormula);
        }
        let tokens = formula_parse::preprocess(tokens);
        formula_parse::validate(&tokens)?;
        Ok(Formula::new(formula_parse::build(&tokens)))
    }
}

/// Why a formula string failed to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The input was empty or contained only whitespace.
    EmptyFormula,
    /// An unrecognized character sequence.
    Lex(LexError),
    /// A tokenizable but structurally invalid formula.
    Invalid(ValidationError),
}

impl ParseError {
    /// Byte offset the failure points at (0 for an empty formula).
    pub fn offset(&self) -> u32 {
        match self {
            ParseError::EmptyFormula => 0,
            ParseError::Lex(err) => err.offset(),
            ParseError::Invalid(err) => err.offset(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyFormula => f.write_str("formula string is empty"),
            ParseError::Lex(err) => write!(f, "{err}"),
            ParseError::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Lex(err)
    }
}

impl From<ValidationError> for ParseError {
    fn from(err: ValidationError) -> Self {
        ParseError::Invalid(err)
    }
}
