//! List functions
//!
//! - Aggregates `sum`, `avg`, `min` and `max` over lists of numbers
//! - Membership: `member` (by `==`), `identicalMember` (by `is`)
//! - `anycompare(op, list, x)` and `allcompare(op, list, x)`
//!
//! List items are expressions; each is evaluated before use.

use super::{list_arg, string_arg};
use crate::engine::Evaluator;
use crate::env::Env;
use crate::error::{EvalError, EvalResult};
use crate::operators::{apply_binary, comparison_operator};
use crate::registry::{Arity, FunctionDefinition, FunctionRegistry};
use classad_ast::{BinaryOp, Expr, ExprRef, ListExpr, Value};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(FunctionDefinition::strict("sum", Arity::Fixed(1), |ev, args| {
        sum(ev, args)
    }));
    registry.register(FunctionDefinition::strict("avg", Arity::Fixed(1), |ev, args| {
        avg(ev, args)
    }));
    registry.register(FunctionDefinition::strict("min", Arity::Fixed(1), |ev, args| {
        extreme(ev, args, "min")
    }));
    registry.register(FunctionDefinition::strict("max", Arity::Fixed(1), |ev, args| {
        extreme(ev, args, "max")
    }));
    registry.register(FunctionDefinition::non_strict(
        "member",
        Arity::Fixed(2),
        |ev, env, args| member(ev, env, args, "member", loosely_equal),
    ));
    registry.register(FunctionDefinition::non_strict(
        "identicalMember",
        Arity::Fixed(2),
        |ev, env, args| member(ev, env, args, "identicalMember", Expr::identical),
    ));
    registry.register(FunctionDefinition::non_strict(
        "anycompare",
        Arity::Fixed(3),
        any_compare,
    ));
    registry.register(FunctionDefinition::strict(
        "allcompare",
        Arity::Fixed(3),
        all_compare,
    ));
}

// === Aggregates ===

/// The evaluated items of a list argument, which must all be numbers
fn numbers(evaluator: &Evaluator, function: &str, args: &[ExprRef]) -> EvalResult<Vec<Value>> {
    let [arg] = args else {
        return Err(EvalError::arity(function));
    };
    let list = arg.as_list().ok_or_else(|| {
        EvalError::invalid_argument(function, format!("invalid argument {arg}"))
    })?;
    list.iter()
        .map(|item| {
            let value = evaluator.evaluate_top(item);
            match value.value() {
                Some(v) if v.is_numeric() => Ok(v.clone()),
                _ => Err(EvalError::invalid_argument(
                    function,
                    format!("non-number in list: {value}"),
                )),
            }
        })
        .collect()
}

fn all_integers(values: &[Value]) -> Option<Vec<i64>> {
    values
        .iter()
        .map(|v| match v {
            Value::Integer(i) => Some(*i),
            _ => None,
        })
        .collect()
}

fn reals(values: &[Value]) -> EvalResult<Vec<f64>> {
    values
        .iter()
        .map(|v| v.as_real().map_err(EvalError::from))
        .collect()
}

/// Integral when every item is an integer, real otherwise
fn sum(evaluator: &Evaluator, args: &[ExprRef]) -> EvalResult<ExprRef> {
    let values = numbers(evaluator, "sum", args)?;
    if let Some(ints) = all_integers(&values) {
        return Ok(Expr::integer(ints.into_iter().fold(0, i64::wrapping_add)));
    }
    Ok(Expr::real(reals(&values)?.into_iter().sum()))
}

/// Always real; 0.0 for an empty list
fn avg(evaluator: &Evaluator, args: &[ExprRef]) -> EvalResult<ExprRef> {
    let values = reals(&numbers(evaluator, "avg", args)?)?;
    if values.is_empty() {
        return Ok(Expr::real(0.0));
    }
    let total: f64 = values.iter().sum();
    Ok(Expr::real(total / values.len() as f64))
}

/// `min` or `max`; Undefined for an empty list
fn extreme(evaluator: &Evaluator, args: &[ExprRef], function: &str) -> EvalResult<ExprRef> {
    let values = numbers(evaluator, function, args)?;
    if values.is_empty() {
        return Ok(Expr::undefined(format!("{function} of empty list")));
    }
    let want_max = function == "max";
    if let Some(ints) = all_integers(&values) {
        let best = if want_max {
            ints.into_iter().max()
        } else {
            ints.into_iter().min()
        };
        return Ok(best.map_or_else(|| Expr::undefined(""), Expr::integer));
    }
    let reals = reals(&values)?;
    let best = reals
        .into_iter()
        .reduce(|a, b| if want_max { a.max(b) } else { a.min(b) });
    Ok(best.map_or_else(|| Expr::undefined(""), Expr::real))
}

// === Membership ===

fn loosely_equal(a: &ExprRef, b: &ExprRef) -> bool {
    match (a.value(), b.value()) {
        (Some(x), Some(y)) => x.loosely_equals(y).unwrap_or(false),
        _ => false,
    }
}

/// Whether any item of the list (second argument) matches the first
/// argument; items that cannot be compared do not match
fn member(
    evaluator: &Evaluator,
    env: &mut Env,
    args: &[ExprRef],
    function: &str,
    matches: fn(&ExprRef, &ExprRef) -> bool,
) -> EvalResult<ExprRef> {
    let [item, list] = args else {
        return Err(EvalError::arity(function));
    };
    let item = evaluator.evaluate(item, &mut env.clone());
    let list = evaluator.evaluate(list, env);
    let list = list_arg(function, 2, &list)?;
    if item.value().is_none() {
        return Err(EvalError::invalid_argument(
            function,
            format!("arg 1 must be a constant, not {}", item.type_name()),
        ));
    }
    let found = list
        .iter()
        .any(|candidate| matches(&item, &evaluator.evaluate(candidate, &mut env.clone())));
    Ok(Expr::boolean(found))
}

// === Comparison over lists ===

fn operator_arg(function: &str, arg: &Expr) -> EvalResult<BinaryOp> {
    let name = string_arg(function, 1, arg)?;
    comparison_operator(name).ok_or_else(|| {
        EvalError::invalid_argument(function, format!("unrecognized operator \"{name}\""))
    })
}

/// True when `item op target` is true for `item` in the list
fn compares_true(op: BinaryOp, item: &ExprRef, target: &ExprRef) -> bool {
    apply_binary(op, item, target).is_ok_and(|r| r.is_true())
}

/// `anycompare(op, list, x)`: true if `item op x` holds for some item
fn any_compare(evaluator: &Evaluator, env: &mut Env, args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [op, list, target] = args else {
        return Err(EvalError::arity("anycompare"));
    };
    let op = operator_arg("anycompare", &evaluator.evaluate(op, &mut env.clone()))?;
    let list = evaluator.evaluate(list, &mut env.clone());
    let list: &ListExpr = list_arg("anycompare", 2, &list)?;
    let target = evaluator.evaluate(target, &mut env.clone());

    let found = list.iter().any(|item| {
        let item = evaluator.evaluate(item, &mut env.clone());
        compares_true(op, &item, &target)
    });
    Ok(Expr::boolean(found))
}

/// `allcompare(op, list, x)`: true if `item op x` holds for every item
fn all_compare(evaluator: &Evaluator, args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [op, list, target] = args else {
        return Err(EvalError::arity("allcompare"));
    };
    let op = operator_arg("allcompare", op)?;
    let list = list_arg("allcompare", 2, list)?;
    let all = list
        .iter()
        .all(|item| compares_true(op, &evaluator.evaluate_top(item), target));
    Ok(Expr::boolean(all))
}
