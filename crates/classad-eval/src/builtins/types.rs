//! Type predicates: `isUndefined`, `isError`, `isString`, `isInteger`,
//! `isReal`, `isBoolean`, `isList`, `isClassad`, `isAbstime`, `isReltime`
//!
//! These are non-strict, so `isUndefined(x)` can look at an Undefined `x`.

use crate::error::EvalError;
use crate::registry::{Arity, FunctionDefinition, FunctionRegistry};
use classad_ast::{Expr, Value};

pub fn register(registry: &mut FunctionRegistry) {
    let predicates: [(&'static str, fn(&Expr) -> bool); 10] = [
        ("isUndefined", |e| e.is_undefined()),
        ("isError", |e| e.is_error()),
        ("isString", |e| matches!(e.value(), Some(Value::String(_)))),
        ("isInteger", |e| matches!(e.value(), Some(Value::Integer(_)))),
        ("isReal", |e| matches!(e.value(), Some(Value::Real(_)))),
        ("isBoolean", |e| matches!(e.value(), Some(Value::Boolean(_)))),
        ("isList", |e| e.as_list().is_some()),
        ("isClassad", |e| e.as_record().is_some()),
        ("isAbstime", |e| matches!(e.value(), Some(Value::AbsTime(_)))),
        ("isReltime", |e| matches!(e.value(), Some(Value::RelTime(_)))),
    ];
    for (name, test) in predicates {
        registry.register(predicate(name, test));
    }
}

fn predicate(name: &'static str, test: fn(&Expr) -> bool) -> FunctionDefinition {
    FunctionDefinition::non_strict(name, Arity::Fixed(1), move |evaluator, env, args| {
        let [arg] = args else {
            return Err(EvalError::arity(name));
        };
        let value = evaluator.evaluate(arg, env);
        Ok(Expr::boolean(test(&value)))
    })
}
