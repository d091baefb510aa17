//! Bitwise operators
//!
//! `| ^ &` act bitwise on integer pairs and logically on boolean pairs.
//! Shifts and `~` take integers only. Shift counts are taken modulo 64, and
//! `>>>` shifts in zeros.

use crate::error::{EvalError, EvalResult};
use classad_ast::{BinaryOp, Value};

pub fn bit_op(op: BinaryOp, a: &Value, b: &Value) -> EvalResult<Value> {
    match (op, a, b) {
        (BinaryOp::BitOr, Value::Integer(x), Value::Integer(y)) => Ok(Value::integer(x | y)),
        (BinaryOp::BitXor, Value::Integer(x), Value::Integer(y)) => Ok(Value::integer(x ^ y)),
        (BinaryOp::BitAnd, Value::Integer(x), Value::Integer(y)) => Ok(Value::integer(x & y)),
        (BinaryOp::BitOr, Value::Boolean(x), Value::Boolean(y)) => Ok(Value::boolean(x | y)),
        (BinaryOp::BitXor, Value::Boolean(x), Value::Boolean(y)) => Ok(Value::boolean(x ^ y)),
        (BinaryOp::BitAnd, Value::Boolean(x), Value::Boolean(y)) => Ok(Value::boolean(x & y)),
        _ => Err(type_error(op, a, b)),
    }
}

pub fn shift(op: BinaryOp, a: &Value, b: &Value) -> EvalResult<Value> {
    let (Value::Integer(x), Value::Integer(y)) = (a, b) else {
        return Err(type_error(op, a, b));
    };
    // wrapping shifts mask the count to its low six bits
    let count = *y as u32;
    let result = match op {
        BinaryOp::LeftShift => x.wrapping_shl(count),
        BinaryOp::RightShift => x.wrapping_shr(count),
        BinaryOp::UnsignedRightShift => (*x as u64).wrapping_shr(count) as i64,
        _ => return Err(type_error(op, a, b)),
    };
    Ok(Value::integer(result))
}

/// `~x`
pub fn complement(a: &Value) -> EvalResult<Value> {
    match a {
        Value::Integer(x) => Ok(Value::integer(!x)),
        _ => Err(EvalError::type_mismatch(format!(
            "Unary ~ of {} value",
            a.type_name()
        ))),
    }
}

fn type_error(op: BinaryOp, a: &Value, b: &Value) -> EvalError {
    EvalError::type_mismatch(format!(
        "type error: {}{}{}",
        a.type_name(),
        op.symbol(),
        b.type_name()
    ))
}
