//! ClassAd operator implementations
//!
//! Operators are strict in Error: an Error operand is the result (the left
//! one if both are), except for `is`/`isnt`, which compare anything. `&&`,
//! `||` and `!` follow four-valued truth tables (see [`logical`]). All other
//! operators are also strict in Undefined and are only defined on
//! constants; a list or record operand is an Error.
//!
//! - [`logical`]: `&& || !`
//! - [`arithmetic`]: `+ - * / %` and unary `+ -`, on numbers and times
//! - [`comparison`]: `== != < > <= >=`
//! - [`bitwise`]: `| ^ &`, shifts and `~`

pub mod arithmetic;
pub mod bitwise;
pub mod comparison;
pub mod logical;

use crate::engine::Evaluator;
use crate::env::Env;
use crate::error::{EvalError, EvalResult};
use classad_ast::{BinaryExpr, BinaryOp, Expr, ExprRef, UnaryExpr, UnaryOp, Value};

impl Evaluator {
    /// Evaluate both operands, the left in a copy of the chain, then apply
    /// the operator
    pub fn eval_binary(&self, expr: &BinaryExpr, env: &mut Env) -> ExprRef {
        let left = self.evaluate(&expr.left, &mut env.clone());
        let right = self.evaluate(&expr.right, env);
        env.clear();
        apply_binary(expr.op, &left, &right).unwrap_or_else(|e| Expr::error(e.to_string()))
    }

    pub fn eval_unary(&self, expr: &UnaryExpr, env: &mut Env) -> ExprRef {
        let operand = self.evaluate(&expr.operand, env);
        env.clear();
        apply_unary(expr.op, &operand).unwrap_or_else(|e| Expr::error(e.to_string()))
    }
}

/// Apply a binary operator to evaluated operands
pub fn apply_binary(op: BinaryOp, left: &ExprRef, right: &ExprRef) -> EvalResult<ExprRef> {
    if op.is_identity() {
        let same = Expr::identical(left, right);
        return Ok(Expr::boolean(same == (op == BinaryOp::Is)));
    }
    if left.is_error() {
        return Ok(left.clone());
    }
    if op.is_logical() {
        return Ok(logical::apply_binary(op, left, right));
    }
    if right.is_error() {
        return Ok(right.clone());
    }

    let a = constant_operand(op.symbol(), left)?;
    if a.is_undefined() {
        return Ok(left.clone());
    }
    let b = constant_operand(op.symbol(), right)?;
    if b.is_undefined() {
        return Ok(right.clone());
    }

    let value = if op.is_bitwise() {
        bitwise::bit_op(op, a, b)?
    } else if op.is_shift() {
        bitwise::shift(op, a, b)?
    } else if op.is_arithmetic() {
        arithmetic::arithmetic(op, a, b)?
    } else {
        Value::boolean(comparison::compare(op, a, b)?)
    };
    Ok(Expr::constant(value))
}

/// Apply a unary operator to an evaluated operand
pub fn apply_unary(op: UnaryOp, operand: &ExprRef) -> EvalResult<ExprRef> {
    if operand.is_error() {
        return Ok(operand.clone());
    }
    match op {
        UnaryOp::Not => Ok(logical::not(operand)),
        UnaryOp::Plus => strict_unary(op, operand, arithmetic::plus),
        UnaryOp::Minus => strict_unary(op, operand, arithmetic::negate),
        UnaryOp::BitNot => strict_unary(op, operand, bitwise::complement),
    }
}

fn strict_unary(
    op: UnaryOp,
    operand: &ExprRef,
    f: fn(&Value) -> EvalResult<Value>,
) -> EvalResult<ExprRef> {
    let a = constant_operand(op.symbol(), operand)?;
    if a.is_undefined() {
        return Ok(operand.clone());
    }
    f(a).map(Expr::constant)
}

fn constant_operand<'a>(symbol: &str, operand: &'a ExprRef) -> EvalResult<&'a Value> {
    operand
        .value()
        .ok_or_else(|| EvalError::type_mismatch(format!("{symbol} applied to List or ClassAd")))
}

/// Parse the operator named by a string, as taken by `anycompare` and
/// `allcompare`
pub fn comparison_operator(name: &str) -> Option<BinaryOp> {
    let op = match name {
        "<" => BinaryOp::Less,
        "<=" => BinaryOp::LessOrEqual,
        ">" => BinaryOp::Greater,
        ">=" => BinaryOp::GreaterOrEqual,
        "==" => BinaryOp::Equal,
        "!=" => BinaryOp::NotEqual,
        _ if name.eq_ignore_ascii_case("is") => BinaryOp::Is,
        _ if name.eq_ignore_ascii_case("isnt") => BinaryOp::Isnt,
        _ => return None,
    };
    Some(op)
}
