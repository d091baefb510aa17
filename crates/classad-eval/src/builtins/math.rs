//! Rounding and random numbers: `floor`, `ceiling`, `round`, `random`

use super::numeric_value;
use crate::error::{EvalError, EvalResult};
use crate::registry::{Arity, FunctionDefinition, FunctionRegistry};
use classad_ast::{Expr, ExprRef, Value};
use rand::Rng;

pub fn register(registry: &mut FunctionRegistry) {
    let roundings: [(&'static str, fn(f64) -> f64); 3] =
        [("floor", f64::floor), ("ceiling", f64::ceil), ("round", round_half_up)];
    for (name, rounding) in roundings {
        registry.register(FunctionDefinition::strict(
            name,
            Arity::Fixed(1),
            move |_, args| rounded(name, rounding, args),
        ));
    }
    registry.register(FunctionDefinition::strict(
        "random",
        Arity::Variadic,
        |_, args| random(args),
    ));
}

/// Halves round toward positive infinity, so `round(-2.5)` is -2
pub fn round_half_up(d: f64) -> f64 {
    let floor = d.floor();
    if d - floor >= 0.5 { floor + 1.0 } else { floor }
}

fn rounded(name: &str, rounding: fn(f64) -> f64, args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [arg] = args else {
        return Err(EvalError::arity(name));
    };
    let value = arg
        .value()
        .ok_or_else(|| EvalError::invalid_argument(name, arg.type_name()))?;
    if let Value::Integer(_) = value {
        return Ok(arg.clone());
    }
    let d = numeric_value(name, value)?;
    Ok(Expr::integer(rounding(d) as i64))
}

/// `random()` is a real in [0, 1); `random(n)` is in [0, n) and has the
/// kind of `n`
fn random(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let mut rng = rand::rng();
    match args {
        [] => Ok(Expr::real(rng.random::<f64>())),
        [arg] => match arg.value() {
            Some(Value::Integer(n)) if *n > 0 => Ok(Expr::integer(rng.random_range(0..*n))),
            Some(Value::Real(x)) if *x > 0.0 => Ok(Expr::real(rng.random::<f64>() * x)),
            Some(Value::Integer(_) | Value::Real(_)) => Err(EvalError::invalid_argument(
                "random",
                "non-positive argument",
            )),
            _ => Err(EvalError::invalid_argument(
                "random",
                format!("invalid argument {arg}"),
            )),
        },
        _ => Err(EvalError::invalid_argument("random", "too many arguments")),
    }
}
