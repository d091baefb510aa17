//! Arithmetic operators
//!
//! Integer pairs stay integral and wrap on overflow; a real operand makes
//! the result real. Times combine as intervals and instants do:
//!
//! | left      | op    | right     | result    |
//! |-----------|-------|-----------|-----------|
//! | timestamp | -     | timestamp | interval  |
//! | timestamp | + -   | interval  | timestamp |
//! | interval  | +     | timestamp | timestamp |
//! | interval  | + -   | interval  | interval  |
//!
//! Division or modulo by zero is an error, for reals as well as integers.

use crate::error::{EvalError, EvalResult};
use classad_ast::{BinaryOp, Value};
use classad_types::{AbsTime, RelTime};

/// Apply `+ - * / %` to two defined constants
pub fn arithmetic(op: BinaryOp, a: &Value, b: &Value) -> EvalResult<Value> {
    match (a, b) {
        (Value::AbsTime(_) | Value::RelTime(_), _) | (_, Value::AbsTime(_) | Value::RelTime(_)) => {
            time_arithmetic(op, a, b)
        }
        (Value::Integer(x), Value::Integer(y)) => integer_arithmetic(op, *x, *y),
        _ if a.is_numeric() && b.is_numeric() => real_arithmetic(op, a.as_real()?, b.as_real()?),
        _ => Err(type_error(op, a, b)),
    }
}

fn integer_arithmetic(op: BinaryOp, x: i64, y: i64) -> EvalResult<Value> {
    let result = match op {
        BinaryOp::Add => x.wrapping_add(y),
        BinaryOp::Subtract => x.wrapping_sub(y),
        BinaryOp::Multiply => x.wrapping_mul(y),
        BinaryOp::Divide | BinaryOp::Modulo if y == 0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Divide => x.wrapping_div(y),
        BinaryOp::Modulo => x.wrapping_rem(y),
        _ => return Err(type_error(op, &Value::integer(x), &Value::integer(y))),
    };
    Ok(Value::integer(result))
}

fn real_arithmetic(op: BinaryOp, x: f64, y: f64) -> EvalResult<Value> {
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Subtract => x - y,
        BinaryOp::Multiply => x * y,
        BinaryOp::Divide | BinaryOp::Modulo if y == 0.0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Divide => x / y,
        BinaryOp::Modulo => x % y,
        _ => return Err(type_error(op, &Value::real(x), &Value::real(y))),
    };
    Ok(Value::real(result))
}

fn time_arithmetic(op: BinaryOp, a: &Value, b: &Value) -> EvalResult<Value> {
    let shifted = |millis: i64, delta: i64| {
        let sum = if op == BinaryOp::Add {
            millis.checked_add(delta)
        } else {
            millis.checked_sub(delta)
        };
        sum.ok_or_else(|| EvalError::type_mismatch(format!("time overflow: {a} {} {b}", op.symbol())))
    };

    match (op, a, b) {
        (BinaryOp::Subtract, Value::AbsTime(x), Value::AbsTime(y)) => {
            Ok(Value::from(RelTime::new(shifted(x.millis, y.millis)?)))
        }
        (BinaryOp::Add | BinaryOp::Subtract, Value::AbsTime(x), Value::RelTime(y)) => Ok(
            Value::from(AbsTime::new(shifted(x.millis, y.millis)?, x.offset_secs)),
        ),
        (BinaryOp::Add, Value::RelTime(x), Value::AbsTime(y)) => Ok(Value::from(AbsTime::new(
            shifted(x.millis, y.millis)?,
            y.offset_secs,
        ))),
        (BinaryOp::Add | BinaryOp::Subtract, Value::RelTime(x), Value::RelTime(y)) => {
            Ok(Value::from(RelTime::new(shifted(x.millis, y.millis)?)))
        }
        _ => Err(type_error(op, a, b)),
    }
}

fn type_error(op: BinaryOp, a: &Value, b: &Value) -> EvalError {
    EvalError::type_mismatch(format!(
        "type error: {} {} {}",
        a.type_name(),
        op.symbol(),
        b.type_name()
    ))
}

/// Unary `+`: numbers and times are unchanged
pub fn plus(a: &Value) -> EvalResult<Value> {
    match a {
        Value::Integer(_) | Value::Real(_) | Value::AbsTime(_) | Value::RelTime(_) => Ok(a.clone()),
        _ => Err(EvalError::type_mismatch(format!(
            "Unary + of {} value",
            a.type_name()
        ))),
    }
}

/// Unary `-` on numbers and intervals
pub fn negate(a: &Value) -> EvalResult<Value> {
    match a {
        Value::Integer(i) => Ok(Value::integer(i.wrapping_neg())),
        Value::Real(d) => Ok(Value::real(-d)),
        Value::RelTime(t) => Ok(Value::from(RelTime::new(t.millis.wrapping_neg()))),
        _ => Err(EvalError::type_mismatch(format!(
            "Unary - of {} value",
            a.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BinaryOp::Add, 1, 2, 3)]
    #[case(BinaryOp::Divide, 7, 2, 3)]
    #[case(BinaryOp::Divide, -7, 2, -3)]
    #[case(BinaryOp::Modulo, -7, 2, -1)]
    #[case(BinaryOp::Add, i64::MAX, 1, i64::MIN)]
    #[case(BinaryOp::Divide, i64::MIN, -1, i64::MIN)]
    fn test_integer_arithmetic(#[case] op: BinaryOp, #[case] x: i64, #[case] y: i64, #[case] expected: i64) {
        assert_eq!(
            arithmetic(op, &Value::integer(x), &Value::integer(y)).unwrap(),
            Value::integer(expected)
        );
    }

    #[test]
    fn test_division_by_zero() {
        for zero in [Value::integer(0), Value::real(0.0)] {
            let err = arithmetic(BinaryOp::Modulo, &Value::integer(5), &zero).unwrap_err();
            assert!(matches!(err, EvalError::DivisionByZero));
        }
    }

    #[test]
    fn test_abs_plus_rel_keeps_zone() {
        let t = Value::abs_time(1_000, 3600);
        let d = Value::rel_time(500);
        assert_eq!(
            arithmetic(BinaryOp::Add, &t, &d).unwrap(),
            Value::abs_time(1_500, 3600)
        );
        assert_eq!(
            arithmetic(BinaryOp::Add, &d, &t).unwrap(),
            Value::abs_time(1_500, 3600)
        );
    }

    #[test]
    fn test_abs_plus_abs_is_a_type_error() {
        let t = Value::abs_time(0, 0);
        let err = arithmetic(BinaryOp::Add, &t, &t).unwrap_err();
        assert_eq!(err.to_string(), "type error: timestamp + timestamp");
    }

    #[test]
    fn test_negating_a_timestamp_fails() {
        let err = negate(&Value::abs_time(0, 0)).unwrap_err();
        assert_eq!(err.to_string(), "Unary - of timestamp value");
    }
}
