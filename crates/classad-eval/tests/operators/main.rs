//! Operator tests, evaluated from parsed text
//!
//! - logical: the four-valued truth tables of `&&`, `||` and `!`
//! - arithmetic: promotion, wrapping, time arithmetic, division by zero
//! - comparison: `==`-style comparisons and `is`
//! - bitwise: `| ^ &`, shifts and `~`

mod arithmetic;
mod bitwise;
mod comparison;
mod logical;

use classad_ast::{ExprRef, Value};
use classad_eval::Evaluator;
use classad_parser::parse_expression;

// ============================================================================
// Test Helpers
// ============================================================================

fn eval(text: &str) -> ExprRef {
    let expr =
        parse_expression(text).unwrap_or_else(|e| panic!("Failed to parse '{}': {}", text, e));
    Evaluator::new().evaluate_top(&expr)
}

fn value(text: &str) -> Value {
    eval(text)
        .value()
        .cloned()
        .unwrap_or_else(|| panic!("Expected a constant from '{}'", text))
}

/// The diagnostic of an Error result
fn error_reason(text: &str) -> String {
    match value(text) {
        Value::Error(reason) => reason.to_string(),
        other => panic!("Expected an error from '{}', got: {}", text, other),
    }
}
