//! Logical operators
//!
//! `&&`, `||` and `!` work on four truth values: FALSE, UNDEFINED, TRUE and
//! ERROR, where any operand that is not a boolean or Undefined counts as
//! ERROR. An ERROR result carries the offending operand's own Error when
//! there is one, and otherwise names the operator.

use classad_ast::{BinaryOp, Expr, ExprRef, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Truth {
    False,
    Undefined,
    True,
    Error,
}

use Truth::{Error as E, False as F, True as T, Undefined as U};

fn classify(operand: &Expr) -> Truth {
    match operand.value() {
        Some(Value::Boolean(false)) => F,
        Some(Value::Boolean(true)) => T,
        Some(Value::Undefined(_)) => U,
        _ => E,
    }
}

/// `a && b`, rows indexed by `a`
///
/// | a \ b     | FALSE | UNDEF | TRUE  | ERROR |
/// |-----------|-------|-------|-------|-------|
/// | FALSE     | FALSE | FALSE | FALSE | FALSE |
/// | UNDEF     | FALSE | UNDEF | UNDEF | ERROR |
/// | TRUE      | FALSE | UNDEF | TRUE  | ERROR |
/// | ERROR     | ERROR | ERROR | ERROR | ERROR |
const AND: [[Truth; 4]; 4] = [
    [F, F, F, F],
    [F, U, U, E],
    [F, U, T, E],
    [E, E, E, E],
];

/// `a || b`, rows indexed by `a`
///
/// | a \ b     | FALSE | UNDEF | TRUE  | ERROR |
/// |-----------|-------|-------|-------|-------|
/// | FALSE     | FALSE | UNDEF | TRUE  | ERROR |
/// | UNDEF     | UNDEF | UNDEF | TRUE  | ERROR |
/// | TRUE      | TRUE  | TRUE  | TRUE  | TRUE  |
/// | ERROR     | ERROR | ERROR | ERROR | ERROR |
const OR: [[Truth; 4]; 4] = [
    [F, U, T, E],
    [U, U, T, E],
    [T, T, T, T],
    [E, E, E, E],
];

/// `!a`: TRUE for FALSE, UNDEF for UNDEF, FALSE for TRUE, ERROR for ERROR
const NOT: [Truth; 4] = [T, U, F, E];

/// Apply `&&` or `||`
pub fn apply_binary(op: BinaryOp, left: &ExprRef, right: &ExprRef) -> ExprRef {
    let table = if op == BinaryOp::And { &AND } else { &OR };
    let outcome = table[classify(left) as usize][classify(right) as usize];
    materialize(outcome, op.symbol(), &[left, right])
}

/// Apply `!`
pub fn not(operand: &ExprRef) -> ExprRef {
    let outcome = NOT[classify(operand) as usize];
    materialize(outcome, "!", &[operand])
}

fn materialize(outcome: Truth, symbol: &str, operands: &[&ExprRef]) -> ExprRef {
    match outcome {
        F => Expr::boolean(false),
        T => Expr::boolean(true),
        U => operands
            .iter()
            .find(|o| o.is_undefined())
            .map_or_else(|| Expr::undefined(""), |o| (*o).clone()),
        E => operands
            .iter()
            .find(|o| o.is_error())
            .map_or_else(
                || Expr::error(format!("{symbol}: argument must be boolean")),
                |o| (*o).clone(),
            ),
    }
}
