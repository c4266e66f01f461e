//! Built-in operations and constants.
//!
//! The default vocabulary every parser starts from. Subtraction is absent
//! on purpose: `-` is the prefix negation operator, and `a - b` is rewritten
//! to `a + -b` before the tree is built, so both spellings produce the same
//! tree.

use crate::operation::{Notation, Operation, MIN_UNARY_PRIORITY};

fn add(a: f64, b: f64) -> f64 {
    a + b
}

fn divide(a: f64, b: f64) -> f64 {
    a / b
}

fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

fn negate(x: f64) -> f64 {
    -x
}

/// Factorial over the integer part of the argument.
///
/// Non-positive arguments yield 0. Domain violations are not evaluation
/// errors; `ln` of a negative yields NaN the same way.
fn factorial(x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let n = x.floor();
    let mut product = 1.0;
    let mut k = 2.0;
    while k <= n {
        product *= k;
        k += 1.0;
    }
    product
}

/// Binary addition, priority 0.
pub fn addition() -> Operation {
    Operation::binary(0, &["+"], add)
}

/// Binary division, priority 1.
pub fn division() -> Operation {
    Operation::binary(1, &["/"], divide)
}

/// Binary multiplication, priority 1.
pub fn multiplication() -> Operation {
    Operation::binary(1, &["*"], multiply)
}

/// Binary power, priority 2.
pub fn power() -> Operation {
    Operation::binary(2, &["^"], f64::powf)
}

/// Prefix negation.
pub fn negation() -> Operation {
    Operation::unary(Notation::Prefix, MIN_UNARY_PRIORITY, &["-"], negate)
}

/// Postfix factorial.
pub fn factorial_op() -> Operation {
    Operation::unary(Notation::Postfix, MIN_UNARY_PRIORITY, &["!"], factorial)
}

/// Prefix natural logarithm.
pub fn natural_log() -> Operation {
    Operation::unary(Notation::Prefix, MIN_UNARY_PRIORITY, &["ln"], f64::ln)
}

/// Prefix sine.
pub fn sine() -> Operation {
    Operation::unary(Notation::Prefix, MIN_UNARY_PRIORITY, &["sin"], f64::sin)
}

/// Prefix cosine.
pub fn cosine() -> Operation {
    Operation::unary(Notation::Prefix, MIN_UNARY_PRIORITY, &["cos"], f64::cos)
}

/// Prefix tangent.
pub fn tangent() -> Operation {
    Operation::unary(Notation::Prefix, MIN_UNARY_PRIORITY, &["tan"], f64::tan)
}

/// Prefix arc sine (`asin` or `arcsin`).
pub fn arc_sine() -> Operation {
    Operation::unary(
        Notation::Prefix,
        MIN_UNARY_PRIORITY,
        &["asin", "arcsin"],
        f64::asin,
    )
}

/// Prefix arc cosine (`acos` or `arccos`).
pub fn arc_cosine() -> Operation {
    Operation::unary(
        Notation::Prefix,
        MIN_UNARY_PRIORITY,
        &["acos", "arccos"],
        f64::acos,
    )
}

/// Prefix arc tangent (`atan` or `arctan`).
pub fn arc_tangent() -> Operation {
    Operation::unary(
        Notation::Prefix,
        MIN_UNARY_PRIORITY,
        &["atan", "arctan"],
        f64::atan,
    )
}

/// All built-in operations.
pub fn operations() -> Vec<Operation> {
    vec![
        addition(),
        division(),
        multiplication(),
        power(),
        negation(),
        factorial_op(),
        natural_log(),
        sine(),
        cosine(),
        tangent(),
        arc_sine(),
        arc_cosine(),
        arc_tangent(),
    ]
}

/// All built-in constants as `(sign, value)` pairs.
pub fn constants() -> Vec<(&'static str, f64)> {
    vec![
        ("pi", std::f64::consts::PI),
        ("π", std::f64::consts::PI),
        ("e", std::f64::consts::E),
    ]
}
