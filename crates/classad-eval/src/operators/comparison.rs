//! Comparison operators
//!
//! Integers and reals compare numerically with each other; strings compare
//! without regard to case; times compare only with the same kind of time.
//! Booleans support only `==` and `!=`. A NaN operand makes every
//! comparison false except `!=`.

use crate::error::{EvalError, EvalResult};
use classad_ast::{BinaryOp, Value};
use std::cmp::Ordering;

/// Apply `== != < > <= >=` to two defined constants
pub fn compare(op: BinaryOp, a: &Value, b: &Value) -> EvalResult<bool> {
    let ordering = match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Integer(_) | Value::Real(_), Value::Integer(_) | Value::Real(_)) => {
            a.as_real()?.partial_cmp(&b.as_real()?)
        }
        (Value::Boolean(x), Value::Boolean(y)) if matches!(op, BinaryOp::Equal | BinaryOp::NotEqual) => {
            Some(x.cmp(y))
        }
        (Value::String(x), Value::String(y)) => Some(cmp_ignore_case(x, y)),
        (Value::AbsTime(x), Value::AbsTime(y)) => Some(x.millis.cmp(&y.millis)),
        (Value::RelTime(x), Value::RelTime(y)) => Some(x.millis.cmp(&y.millis)),
        (Value::AbsTime(_) | Value::RelTime(_), _) | (_, Value::AbsTime(_) | Value::RelTime(_)) => {
            return Err(EvalError::type_mismatch(format!(
                "type error: {} {} {}",
                a.type_name(),
                op.symbol(),
                b.type_name()
            )));
        }
        _ => {
            return Err(EvalError::type_mismatch(format!(
                "attempt to compare {} {} {}",
                a.type_name(),
                op.symbol(),
                b.type_name()
            )));
        }
    };

    let Some(ordering) = ordering else {
        return Ok(op == BinaryOp::NotEqual);
    };
    Ok(match op {
        BinaryOp::Equal => ordering == Ordering::Equal,
        BinaryOp::NotEqual => ordering != Ordering::Equal,
        BinaryOp::Less => ordering == Ordering::Less,
        BinaryOp::LessOrEqual => ordering != Ordering::Greater,
        BinaryOp::Greater => ordering == Ordering::Greater,
        BinaryOp::GreaterOrEqual => ordering != Ordering::Less,
        _ => {
            return Err(EvalError::type_mismatch(format!(
                "{} is not a comparison",
                op.symbol()
            )));
        }
    })
}

/// Order strings by their lower-case characters
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
