//! String functions: `strcat`, `substr`, `strcmp`, `stricmp`, `toUpper`,
//! `toLower` and `size`
//!
//! Offsets and lengths count characters, not bytes.

use super::{integer_arg, string_arg, text_of};
use crate::error::{EvalError, EvalResult};
use crate::operators::comparison::cmp_ignore_case;
use crate::registry::{Arity, FunctionDefinition, FunctionRegistry};
use classad_ast::{Expr, ExprRef, Value};
use std::cmp::Ordering;

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(FunctionDefinition::strict(
        "strcat",
        Arity::Variadic,
        |_, args| Ok(Expr::string(args.iter().map(|a| text_of(a)).collect::<String>())),
    ));
    registry.register(FunctionDefinition::strict(
        "substr",
        Arity::Variadic,
        |_, args| substr(args),
    ));
    registry.register(FunctionDefinition::strict(
        "strcmp",
        Arity::Fixed(2),
        |_, args| compare_strings(args, str::cmp),
    ));
    registry.register(FunctionDefinition::strict(
        "stricmp",
        Arity::Fixed(2),
        |_, args| compare_strings(args, cmp_ignore_case),
    ));
    registry.register(FunctionDefinition::strict(
        "toUpper",
        Arity::Fixed(1),
        |_, args| case_mapped(args, str::to_uppercase),
    ));
    registry.register(FunctionDefinition::strict(
        "toLower",
        Arity::Fixed(1),
        |_, args| case_mapped(args, str::to_lowercase),
    ));
    registry.register(FunctionDefinition::strict("size", Arity::Fixed(1), |_, args| {
        size(args)
    }));
}

/// `substr(s, offset [, length])`
///
/// A negative offset counts back from the end of `s`. A negative length
/// leaves that many characters off the end. Out-of-range requests are
/// clipped rather than rejected.
fn substr(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let (s, offset, length) = match args {
        [s, offset] => (s, offset, None),
        [s, offset, length] => (s, offset, Some(length)),
        _ => return Err(EvalError::arity("substr")),
    };
    let chars: Vec<char> = string_arg("substr", 1, s)?.chars().collect();
    let len = chars.len() as i64;

    let mut start = integer_arg("substr", 2, offset)?;
    if start < 0 {
        start += len;
    }
    if start > len {
        return Ok(Expr::string(""));
    }
    let start = start.max(0);

    let end = match length {
        None => len,
        Some(length) => {
            let mut count = integer_arg("substr", 3, length)?;
            if count < 0 {
                count += len - start;
            }
            (start + count.max(0)).min(len)
        }
    };

    let text: String = chars[start as usize..end as usize].iter().collect();
    Ok(Expr::string(text))
}

/// -1, 0 or 1 as the first string orders before, with or after the second
fn compare_strings(args: &[ExprRef], cmp: fn(&str, &str) -> Ordering) -> EvalResult<ExprRef> {
    let [a, b] = args else {
        return Err(EvalError::arity("strcmp"));
    };
    let ordering = cmp(&text_of(a), &text_of(b));
    Ok(Expr::integer(ordering as i64))
}

fn case_mapped(args: &[ExprRef], map: fn(&str) -> String) -> EvalResult<ExprRef> {
    let [arg] = args else {
        return Err(EvalError::arity("toUpper"));
    };
    Ok(Expr::string(map(&text_of(arg))))
}

/// Characters in a string, items in a list or attributes in a record
fn size(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [arg] = args else {
        return Err(EvalError::arity("size"));
    };
    let n = match arg.as_ref() {
        Expr::Constant(Value::String(s)) => s.chars().count(),
        Expr::List(list) => list.len(),
        Expr::Record(record) => record.len(),
        _ => {
            return Err(EvalError::invalid_argument(
                "size",
                format!("invalid argument {arg}"),
            ));
        }
    };
    Ok(Expr::integer(n as i64))
}
