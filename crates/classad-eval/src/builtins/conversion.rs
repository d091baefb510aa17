//! Conversions: `int`, `real` and `string`

use super::text_of;
use crate::error::{EvalError, EvalResult};
use crate::registry::{Arity, FunctionDefinition, FunctionRegistry};
use classad_ast::{Expr, ExprRef, Value};
use classad_types::parse_real;

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(FunctionDefinition::strict("int", Arity::Fixed(1), |_, args| {
        int(args)
    }));
    registry.register(FunctionDefinition::strict("real", Arity::Fixed(1), |_, args| {
        real(args)
    }));
    registry.register(FunctionDefinition::strict(
        "string",
        Arity::Fixed(1),
        |_, args| string(args),
    ));
}

/// Reals truncate toward zero, booleans are 0 or 1, times are whole
/// seconds and strings are read as reals and truncated
fn int(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [arg] = args else {
        return Err(EvalError::arity("int"));
    };
    let i = match arg.value() {
        Some(Value::Integer(_)) => return Ok(arg.clone()),
        Some(Value::Real(d)) => *d as i64,
        Some(Value::Boolean(b)) => i64::from(*b),
        Some(Value::AbsTime(t)) => t.millis / 1000,
        Some(Value::RelTime(t)) => t.millis / 1000,
        Some(Value::String(s)) => parse_real(s)
            .map_err(|_| EvalError::invalid_argument("int", format!("ill-formed integer {s}")))?
            as i64,
        _ => {
            return Err(EvalError::invalid_argument(
                "int",
                format!("cannot convert {} to integer", arg.type_name()),
            ));
        }
    };
    Ok(Expr::integer(i))
}

fn real(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [arg] = args else {
        return Err(EvalError::arity("real"));
    };
    let d = match arg.value() {
        Some(Value::Real(_)) => return Ok(arg.clone()),
        Some(Value::Integer(i)) => *i as f64,
        Some(Value::Boolean(b)) => f64::from(u8::from(*b)),
        Some(Value::AbsTime(t)) => t.millis as f64 / 1000.0,
        Some(Value::RelTime(t)) => t.millis as f64 / 1000.0,
        Some(Value::String(s)) => parse_real(s)
            .map_err(|_| EvalError::invalid_argument("real", format!("ill-formed real {s}")))?,
        _ => {
            return Err(EvalError::invalid_argument(
                "real",
                format!("cannot convert {} to real", arg.type_name()),
            ));
        }
    };
    Ok(Expr::real(d))
}

fn string(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [arg] = args else {
        return Err(EvalError::arity("string"));
    };
    match arg.value() {
        Some(Value::String(_)) => Ok(arg.clone()),
        _ => Ok(Expr::string(text_of(arg))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Expr::real(-3.7), -3)]
    #[case(Expr::boolean(true), 1)]
    #[case(Expr::string("42.9"), 42)]
    #[case(Expr::constant(Value::rel_time(90_500)), 90)]
    fn test_int(#[case] arg: ExprRef, #[case] expected: i64) {
        assert_eq!(int(&[arg]).unwrap().value(), Some(&Value::integer(expected)));
    }

    #[test]
    fn test_int_of_bad_string() {
        let err = int(&[Expr::string("lots")]).unwrap_err();
        assert_eq!(err.to_string(), "int: ill-formed integer lots");
    }

    #[test]
    fn test_real_reads_special_values() {
        let inf = real(&[Expr::string("-INF")]).unwrap();
        assert_eq!(inf.value(), Some(&Value::real(f64::NEG_INFINITY)));
    }

    #[test]
    fn test_string_of_a_list() {
        let text = string(&[Expr::list(vec![Expr::integer(1), Expr::real(0.5)])]).unwrap();
        assert_eq!(
            text.value(),
            Some(&Value::string("{1,5.000000000000000E-01}"))
        );
    }
}
