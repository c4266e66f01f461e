//! Evaluator for frozen formula trees, and the [`Formula`] object that
//! pairs a tree with its variable bindings.
//!
//! Evaluation is a plain recursive post-order walk: tree depth is bounded
//! by the length of the source expression, so no explicit work stack is
//! needed. The only runtime failure mode is a variable without a bound
//! value; everything structural was settled before the tree was frozen.

mod error;

use std::collections::BTreeSet;

use formula_ir::{Item, OpKind};
use formula_parse::{FormulaTree, NodeId};
use rustc_hash::FxHashMap;

pub use error::{BindingError, EvalError};

/// Evaluate a tree against the given bindings.
///
/// # Errors
/// Returns [`EvalError::UnboundVariable`] for the first variable
/// encountered that has no entry in `bindings`.
pub fn evaluate(tree: &FormulaTree, bindings: &FxHashMap<char, f64>) -> Result<f64, EvalError> {
    eval_node(tree, tree.root(), bindings)
}

fn eval_node(
    tree: &FormulaTree,
    id: NodeId,
    bindings: &FxHashMap<char, f64>,
) -> Result<f64, EvalError> {
    match tree.item(id) {
        Item::Digit(value) => Ok(*value),
        Item::Variable(name) => bindings
            .get(name)
            .copied()
            .ok_or(EvalError::UnboundVariable { name: *name }),
        Item::Operation(op) => match op.kind() {
            OpKind::Unary { apply, .. } => {
                let Some(operand) = tree.left(id) else {
                    unreachable!("unary operations are built with an operand")
                };
                Ok(apply(eval_node(tree, operand, bindings)?))
            }
            OpKind::Binary { apply } => {
                let (Some(left), Some(right)) = (tree.left(id), tree.right(id)) else {
                    unreachable!("binary operations are built with both operands")
                };
                let left = eval_node(tree, left, bindings)?;
                let right = eval_node(tree, right, bindings)?;
                Ok(apply(left, right))
            }
        },
        Item::OpenBracket | Item::CloseBracket => {
            unreachable!("brackets are spliced out before evaluation")
        }
    }
}

/// A parsed formula: the frozen tree plus per-instance variable bindings.
///
/// The discovered variable set is fixed at construction; bindings are the
/// only mutable state and belong to this instance alone. Callers that need
/// concurrent evaluation use independent instances.
#[derive(Clone, Debug)]
pub struct Formula {
    tree: FormulaTree,
    bindings: FxHashMap<char, f64>,
}

impl Formula {
    /// Wrap a frozen tree with an empty binding map.
    pub fn new(tree: FormulaTree) -> Self {
        Formula {
            tree,
            bindings: FxHashMap::default(),
        }
    }

    /// The distinct variable names in this formula, in sorted order.
    pub fn variables(&self) -> &BTreeSet<char> {
        self.tree.variables()
    }

    /// Bind a value to a variable, chainable:
    /// `formula.set_variable('x', 1.0)?.set_variable('y', 2.0)?`.
    ///
    /// # Errors
    /// Returns [`BindingError::UnknownVariable`] if the formula has no such
    /// variable.
    pub fn set_variable(&mut self, name: char, value: f64) -> Result<&mut Self, BindingError> {
        if !self.tree.variables().contains(&name) {
            return Err(BindingError::UnknownVariable { name });
        }
        self.bindings.insert(name, value);
        Ok(self)
    }

    /// Calculate the formula's value under the current bindings.
    ///
    /// A result of negative zero is reported as positive zero; the sign of
    /// zero is not an observable distinction for formulas.
    ///
    /// # Errors
    /// Returns [`EvalError::UnboundVariable`] if any variable in the
    /// formula has not been bound.
    pub fn calculate(&self) -> Result<f64, EvalError> {
        let value = evaluate(&self.tree, &self.bindings)?;
        // `==` ignores the sign of zero, so this folds -0.0 into 0.0.
        Ok(if value == 0.0 { 0.0 } else { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_ir::{ConstantResolver, OperationResolver};
    use pretty_assertions::assert_eq;

    fn formula(source: &str) -> Formula {
        let tokens = formula_lexer::tokenize(
            source,
            &ConstantResolver::default(),
            &OperationResolver::default(),
        )
        .unwrap();
        let tokens = formula_parse::preprocess(tokens);
        formula_parse::validate(&tokens).unwrap();
        Formula::new(formula_parse::build(&tokens))
    }

    fn calculate(source: &str) -> f64 {
        formula(source).calculate().unwrap()
    }

    #[test]
    fn constant_formulas() {
        assert_eq!(calculate("2+3*4"), 14.0);
        assert_eq!(calculate("(2+3)*4"), 20.0);
        assert_eq!(calculate("7--2"), 9.0);
        assert_eq!(calculate("3+2*1-6/3"), 3.0);
        assert_eq!(calculate("2^3"), 8.0);
    }

    #[test]
    fn unary_operations() {
        assert_eq!(calculate("5!"), 120.0);
        assert_eq!(calculate("sin(2)"), f64::sin(2.0));
        assert_eq!(calculate("ln(e)"), std::f64::consts::E.ln());
        assert_eq!(calculate("asin(1) - arcsin(1)"), 0.0);
    }

    #[test]
    fn variables_bind_and_evaluate() {
        let mut f = formula("x + y / 2");
        f.set_variable('x', 1.0)
            .unwrap()
            .set_variable('y', 4.0)
            .unwrap();
        assert_eq!(f.calculate().unwrap(), 3.0);
        // Rebinding overwrites.
        f.set_variable('y', 8.0).unwrap();
        assert_eq!(f.calculate().unwrap(), 5.0);
    }

    #[test]
    fn unbound_variable_fails_calculation() {
        let mut f = formula("x + y");
        f.set_variable('x', 1.0).unwrap();
        assert_eq!(
            f.calculate(),
            Err(EvalError::UnboundVariable { name: 'y' })
        );
    }

    #[test]
    fn binding_an_absent_variable_fails() {
        let mut f = formula("x + 1");
        assert_eq!(
            f.set_variable('q', 1.0).unwrap_err(),
            BindingError::UnknownVariable { name: 'q' }
        );
    }

    #[test]
    fn variables_are_reported_sorted_and_distinct() {
        let f = formula("z + x*z - y");
        assert_eq!(
            f.variables().iter().copied().collect::<Vec<_>>(),
            vec!['x', 'y', 'z']
        );
    }

    #[test]
    fn negative_zero_normalizes_to_positive_zero() {
        let value = calculate("0 * -1");
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
    }

    #[test]
    fn bracketed_scopes_evaluate_inside_out() {
        let mut f = formula("((x + 3) / z + sin(2 * x)) / (10 - z)");
        for (x, z) in [(1.0, 2.0), (-4.0, 7.5), (0.5, 0.25)] {
            f.set_variable('x', x).unwrap().set_variable('z', z).unwrap();
            let expected = ((x + 3.0) / z + f64::sin(2.0 * x)) / (10.0 - z);
            assert_eq!(f.calculate().unwrap(), expected);
        }
    }

    #[test]
    fn the_whole_pipeline_matches_native_arithmetic() {
        let mut f = formula("x + sin(2) + y / 2.5 - z * (10 * 5 - 2) - z * (2 + x)");
        for i in 0..10 {
            let v = f64::from(i) - 5.0;
            f.set_variable('x', v).unwrap();
            f.set_variable('y', v).unwrap();
            f.set_variable('z', v).unwrap();
            let expected = v + f64::sin(2.0) + v / 2.5 - v * (10.0 * 5.0 - 2.0) - v * (2.0 + v);
            let expected = if expected == 0.0 { 0.0 } else { expected };
            assert_eq!(f.calculate().unwrap(), expected);
        }
    }
}
