//! Pattern matching: `regexp`, `regexpMember`, `glob` and `iglob`
//!
//! Regular expressions match anywhere in the subject unless anchored.

use super::{list_arg, string_arg};
use crate::engine::Evaluator;
use crate::env::Env;
use crate::error::{EvalError, EvalResult};
use crate::registry::{Arity, FunctionDefinition, FunctionRegistry};
use classad_ast::{Expr, ExprRef, Value};
use regex::{Regex, RegexBuilder};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(FunctionDefinition::strict(
        "regexp",
        Arity::Variadic,
        |_, args| regexp(args),
    ));
    registry.register(FunctionDefinition::non_strict(
        "regexpMember",
        Arity::Fixed(2),
        regexp_member,
    ));
    registry.register(FunctionDefinition::strict("glob", Arity::Fixed(2), |_, args| {
        glob_call("glob", args, false)
    }));
    registry.register(FunctionDefinition::strict("iglob", Arity::Fixed(2), |_, args| {
        glob_call("iglob", args, true)
    }));
}

/// Compile `pattern` with option letters `i` (ignore case), `m` (`^` and
/// `$` match at line breaks), `s` (`.` matches a line break) and `x`
/// (ignore whitespace and comments), in either case
pub fn compile_pattern(function: &str, pattern: &str, options: &str) -> EvalResult<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for option in options.chars() {
        match option.to_ascii_lowercase() {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            _ => continue,
        };
    }
    builder
        .build()
        .map_err(|e| EvalError::invalid_regex(function, pattern, e.to_string()))
}

/// `regexp(pattern, subject [, options])`
fn regexp(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let (pattern, subject, options) = match args {
        [pattern, subject] => (pattern, subject, None),
        [pattern, subject, options] => (pattern, subject, Some(options)),
        _ => return Err(EvalError::arity("regexp")),
    };
    let pattern = string_arg("regexp", 1, pattern)?;
    let subject = string_arg("regexp", 2, subject)?;
    let options = match options {
        Some(options) => string_arg("regexp", 3, options)?,
        None => "",
    };
    let re = compile_pattern("regexp", pattern, options)?;
    Ok(Expr::boolean(re.is_match(subject)))
}

/// `regexpMember(pattern, list)`: whether some string in the list matches
fn regexp_member(evaluator: &Evaluator, env: &mut Env, args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [pattern, list] = args else {
        return Err(EvalError::arity("regexpMember"));
    };
    let pattern = evaluator.evaluate(pattern, &mut env.clone());
    let re = compile_pattern(
        "regexpMember",
        string_arg("regexpMember", 1, &pattern)?,
        "",
    )?;
    let list = evaluator.evaluate(list, env);
    let list = list_arg("regexpMember", 2, &list)?;

    for item in list {
        let item = evaluator.evaluate(item, &mut env.clone());
        let Some(Value::String(s)) = item.value() else {
            return Err(EvalError::invalid_argument(
                "regexpMember",
                format!("non-string in list: {item}"),
            ));
        };
        if re.is_match(s) {
            return Ok(Expr::boolean(true));
        }
    }
    Ok(Expr::boolean(false))
}

fn glob_call(function: &str, args: &[ExprRef], ignore_case: bool) -> EvalResult<ExprRef> {
    let [subject, pattern] = args else {
        return Err(EvalError::arity(function));
    };
    let subject = string_arg(function, 1, subject)?;
    let pattern = string_arg(function, 2, pattern)?;
    Ok(Expr::boolean(glob(pattern, subject, ignore_case)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    /// `?`
    One,
    /// `*`
    Any,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '?' => Token::One,
            '*' => Token::Any,
            // a trailing backslash stands for itself
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            c => Token::Literal(c),
        });
    }
    tokens
}

/// Shell-style wildcard match of the whole of `subject`
///
/// `?` matches one character, `*` any run of characters, and a backslash
/// makes the next pattern character literal. With `ignore_case`, a pattern
/// letter also matches its upper-case form.
pub fn glob(pattern: &str, subject: &str, ignore_case: bool) -> bool {
    let tokens = tokenize(pattern);
    let text: Vec<char> = subject.chars().collect();
    let literal_matches = |p: char, c: char| {
        p == c || (ignore_case && p.to_uppercase().eq(std::iter::once(c)))
    };

    let (mut t, mut s) = (0, 0);
    // position after the last `*`, and the text position it was tried at
    let mut backtrack: Option<(usize, usize)> = None;
    while s < text.len() {
        match tokens.get(t) {
            Some(Token::Any) => {
                t += 1;
                backtrack = Some((t, s));
                continue;
            }
            Some(Token::One) => {
                t += 1;
                s += 1;
                continue;
            }
            Some(Token::Literal(p)) if literal_matches(*p, text[s]) => {
                t += 1;
                s += 1;
                continue;
            }
            _ => {}
        }
        match backtrack {
            Some((after_star, tried)) => {
                t = after_star;
                s = tried + 1;
                backtrack = Some((after_star, tried + 1));
            }
            None => return false,
        }
    }
    tokens[t..].iter().all(|token| *token == Token::Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("*.txt", "notes.txt", false, true)]
    #[case("*.txt", "notes.txt.bak", false, false)]
    #[case("a?c", "abc", false, true)]
    #[case("a?c", "ac", false, false)]
    #[case("*", "", false, true)]
    #[case("a*b*c", "aXXbYYbc", false, true)]
    #[case("\\*x", "*x", false, true)]
    #[case("\\*x", "ax", false, false)]
    #[case("trail\\", "trail\\", false, true)]
    #[case("vm*", "VM12", true, true)]
    #[case("VM*", "vm12", true, false)]
    #[case("vm*", "VM12", false, false)]
    fn test_glob(
        #[case] pattern: &str,
        #[case] subject: &str,
        #[case] ignore_case: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(glob(pattern, subject, ignore_case), expected);
    }

    #[test]
    fn test_regexp_options() {
        let args = [Expr::string("^B"), Expr::string("abc\nbcd"), Expr::string("IM")];
        assert_eq!(regexp(&args).unwrap().to_string(), "true");
        let args = [Expr::string("^B"), Expr::string("abc\nbcd")];
        assert_eq!(regexp(&args).unwrap().to_string(), "false");
    }

    #[test]
    fn test_bad_pattern() {
        let err = regexp(&[Expr::string("("), Expr::string("x")]).unwrap_err();
        assert!(err.to_string().starts_with("regexp: bad pattern '(':"), "{err}");
    }
}
