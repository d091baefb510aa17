//! Standard function library
//!
//! Every builtin is registered by name in [`register_standard`]. Strict
//! functions see only defined, non-error arguments; the type predicates,
//! the membership tests and `anycompare` are non-strict and evaluate their
//! own arguments.

pub mod conversion;
pub mod list;
pub mod math;
pub mod pattern;
pub mod string;
pub mod time;
pub mod types;

use crate::error::{EvalError, EvalResult};
use crate::registry::FunctionRegistry;
use classad_ast::{Expr, ListExpr, Value};

/// Register the whole standard library
pub fn register_standard(registry: &mut FunctionRegistry) {
    types::register(registry);
    conversion::register(registry);
    math::register(registry);
    string::register(registry);
    list::register(registry);
    pattern::register(registry);
    time::register(registry);
}

// === Argument helpers ===

/// A string argument's text, or the canonical text of any other value
pub fn text_of(expr: &Expr) -> String {
    match expr.value() {
        Some(Value::String(s)) => s.to_string(),
        _ => expr.to_string(),
    }
}

/// The `position`-th argument (counting from 1) as a string
pub fn string_arg<'a>(function: &str, position: usize, arg: &'a Expr) -> EvalResult<&'a str> {
    match arg.value() {
        Some(Value::String(s)) => Ok(s),
        _ => Err(EvalError::invalid_argument(
            function,
            format!("arg {position} must be string, not {}", arg.type_name()),
        )),
    }
}

/// The `position`-th argument (counting from 1) as an integer
pub fn integer_arg(function: &str, position: usize, arg: &Expr) -> EvalResult<i64> {
    match arg.value() {
        Some(Value::Integer(i)) => Ok(*i),
        _ => Err(EvalError::invalid_argument(
            function,
            format!("arg {position} must be int, not {}", arg.type_name()),
        )),
    }
}

/// The `position`-th argument (counting from 1) as a list
pub fn list_arg<'a>(function: &str, position: usize, arg: &'a Expr) -> EvalResult<&'a ListExpr> {
    arg.as_list().ok_or_else(|| {
        EvalError::invalid_argument(
            function,
            format!("arg {position} must be list, not {}", arg.type_name()),
        )
    })
}

/// A number for numeric builtins: numbers as they are, booleans as 0 or 1,
/// times in seconds and strings parsed as reals
pub fn numeric_value(function: &str, value: &Value) -> EvalResult<f64> {
    match value {
        Value::Integer(i) => Ok(*i as f64),
        Value::Real(d) => Ok(*d),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::AbsTime(t) => Ok(t.millis as f64 / 1000.0),
        Value::RelTime(t) => Ok(t.millis as f64 / 1000.0),
        Value::String(s) => classad_types::parse_real(s).map_err(|_| {
            EvalError::invalid_argument(function, format!("invalid number {s}"))
        }),
        _ => Err(EvalError::invalid_argument(
            function,
            format!("{} is not a number", value.type_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_of() {
        assert_eq!(text_of(&Expr::string("plain")), "plain");
        assert_eq!(text_of(&Expr::integer(3)), "3");
        assert_eq!(
            text_of(&Expr::list(vec![Expr::string("a")])),
            "{\"a\"}"
        );
    }

    #[test]
    fn test_argument_messages() {
        let err = string_arg("substr", 1, &Expr::integer(1)).unwrap_err();
        assert_eq!(err.to_string(), "substr: arg 1 must be string, not integer");
        let err = list_arg("member", 2, &Expr::string("x")).unwrap_err();
        assert_eq!(err.to_string(), "member: arg 2 must be list, not string");
    }
}
