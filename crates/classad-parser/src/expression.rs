//! Expression parser using recursive descent with precedence climbing
//!
//! Levels, loosest first:
//! - conditional `c ? t : f` (right-associative)
//! - binary levels 0..=9 from [`BinaryOp::precedence`], all left-associative
//! - unary `+ - ~ !`
//! - postfix selection `.name` and subscript `[index]`
//! - atoms: literals, references, calls, records, lists, parentheses

use crate::combinators::{
    Input, PResult, attr_name, fail_with, identifier, keyword, lit, number_literal,
    string_literal, ws,
};
use classad_ast::{AttrName, BinaryOp, Expr, ExprRef, RecordExpr, UnaryOp};
use winnow::error::ContextError;
use winnow::prelude::*;

/// Parse a full expression (entry point)
pub fn expression_parser(input: &mut Input<'_>) -> PResult<ExprRef> {
    ws.parse_next(input)?;
    conditional_expression(input)
}

/// `c ? t : f`
fn conditional_expression(input: &mut Input<'_>) -> PResult<ExprRef> {
    let condition = binary_expression(input, 0)?;
    ws.parse_next(input)?;
    if lit("?").parse_next(input).is_err() {
        return Ok(condition);
    }
    let then_expr = expression_parser(input)?;
    ws.parse_next(input)?;
    lit(":").parse_next(input)?;
    let else_expr = expression_parser(input)?;
    Ok(Expr::cond(condition, then_expr, else_expr))
}

/// One binary precedence level; operands come from the next tighter level
fn binary_expression(input: &mut Input<'_>, level: u8) -> PResult<ExprRef> {
    if level > BinaryOp::Modulo.precedence() {
        return unary_expression(input);
    }
    let mut left = binary_expression(input, level + 1)?;

    loop {
        ws.parse_next(input)?;
        let Some(op) = binary_operator(input, level) else {
            break;
        };
        let right = binary_expression(input, level + 1)?;
        left = Expr::binary(op, left, right);
    }

    Ok(left)
}

/// Consume the operator at `level` if the input starts with one
///
/// Punctuation is matched longest first, so `||` is never read as `|` and
/// `>>>` never as `>>` or `>`.
fn binary_operator(input: &mut Input<'_>, level: u8) -> Option<BinaryOp> {
    let spelled = BinaryOp::ALL
        .iter()
        .filter(|op| !op.is_identity() && input.starts_with(op.symbol()))
        .max_by_key(|op| op.symbol().len())
        .copied();

    for op in BinaryOp::ALL.iter().filter(|op| op.precedence() == level) {
        let matched = if op.is_identity() {
            keyword(op.symbol()).parse_next(input).is_ok()
        } else {
            spelled == Some(*op) && lit(op.symbol()).parse_next(input).is_ok()
        };
        if matched {
            return Some(*op);
        }
    }
    None
}

/// Prefix operators; a minus sign directly before a number is part of the
/// literal
fn unary_expression(input: &mut Input<'_>) -> PResult<ExprRef> {
    ws.parse_next(input)?;

    let negative_number = input
        .strip_prefix('-')
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()));
    if negative_number {
        lit("-").parse_next(input)?;
        let number = number_literal(true).parse_next(input)?;
        return postfix_operators(input, number);
    }

    let op = if lit("+").parse_next(input).is_ok() {
        Some(UnaryOp::Plus)
    } else if lit("-").parse_next(input).is_ok() {
        Some(UnaryOp::Minus)
    } else if lit("~").parse_next(input).is_ok() {
        Some(UnaryOp::BitNot)
    } else if lit("!").parse_next(input).is_ok() {
        Some(UnaryOp::Not)
    } else {
        None
    };

    match op {
        Some(op) => {
            let operand = unary_expression(input)?;
            Ok(Expr::unary(op, operand))
        }
        None => postfix_expression(input),
    }
}

/// `base.name` and `base[index]`, left to right
fn postfix_expression(input: &mut Input<'_>) -> PResult<ExprRef> {
    let base = atom(input)?;
    postfix_operators(input, base)
}

fn postfix_operators(input: &mut Input<'_>, mut base: ExprRef) -> PResult<ExprRef> {
    loop {
        ws.parse_next(input)?;

        if lit(".").parse_next(input).is_ok() {
            ws.parse_next(input)?;
            let name = attr_name(input)?;
            base = Expr::select(base, name);
            continue;
        }

        if lit("[").parse_next(input).is_ok() {
            let index = expression_parser(input)?;
            ws.parse_next(input)?;
            lit("]").parse_next(input)?;
            base = Expr::subscript(base, index);
            continue;
        }

        break;
    }

    Ok(base)
}

/// Parse atom (highest precedence: literals, references, calls and brackets)
fn atom(input: &mut Input<'_>) -> PResult<ExprRef> {
    ws.parse_next(input)?;

    match input.chars().next() {
        Some('"') => string_literal.map(Expr::string).parse_next(input),
        Some('\'') => attr_name.map(Expr::attr_ref).parse_next(input),
        Some(c) if c.is_ascii_digit() => number_literal(false).parse_next(input),
        Some('(') => {
            lit("(").parse_next(input)?;
            let expr = expression_parser(input)?;
            ws.parse_next(input)?;
            lit(")").parse_next(input)?;
            Ok(expr)
        }
        Some('[') => record_expression(input),
        Some('{') => list_expression(input),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => word_expression(input),
        _ => Err(ContextError::new()),
    }
}

/// Keyword literals, calls and attribute references
fn word_expression(input: &mut Input<'_>) -> PResult<ExprRef> {
    if keyword("true").parse_next(input).is_ok() {
        return Ok(Expr::boolean(true));
    }
    if keyword("false").parse_next(input).is_ok() {
        return Ok(Expr::boolean(false));
    }
    if keyword("undefined").parse_next(input).is_ok() {
        return Ok(Expr::undefined("literal UNDEFINED"));
    }
    if keyword("error").parse_next(input).is_ok() {
        return Ok(Expr::error("literal ERROR"));
    }
    let checkpoint = *input;
    if keyword("is").parse_next(input).is_ok() || keyword("isnt").parse_next(input).is_ok() {
        *input = checkpoint;
        return Err(ContextError::new());
    }

    let name = identifier(input)?;
    ws.parse_next(input)?;
    if lit("(").parse_next(input).is_err() {
        return Ok(Expr::attr_ref(name));
    }

    let mut args = Vec::new();
    ws.parse_next(input)?;
    if lit(")").parse_next(input).is_err() {
        loop {
            args.push(expression_parser(input)?);
            ws.parse_next(input)?;
            if lit(",").parse_next(input).is_err() {
                break;
            }
        }
        lit(")").parse_next(input)?;
    }
    Ok(Expr::call(name, args))
}

/// `{a, b, c}`
fn list_expression(input: &mut Input<'_>) -> PResult<ExprRef> {
    lit("{").parse_next(input)?;
    ws.parse_next(input)?;

    let mut items = Vec::new();
    if lit("}").parse_next(input).is_err() {
        loop {
            items.push(expression_parser(input)?);
            ws.parse_next(input)?;
            if lit(",").parse_next(input).is_err() {
                break;
            }
        }
        lit("}").parse_next(input)?;
    }

    Ok(Expr::list(items))
}

/// `[a = 1; b = 2]`, with an optional trailing `;`
fn record_expression(input: &mut Input<'_>) -> PResult<ExprRef> {
    lit("[").parse_next(input)?;
    let mut record = RecordExpr::new();

    loop {
        ws.parse_next(input)?;
        if lit("]").parse_next(input).is_ok() {
            break;
        }

        let name = attr_name(input)?;
        ws.parse_next(input)?;
        definition_sign(input)?;
        let value = expression_parser(input)?;
        define(input, &mut record, name, value)?;

        ws.parse_next(input)?;
        if lit(";").parse_next(input).is_err() {
            ws.parse_next(input)?;
            lit("]").parse_next(input)?;
            break;
        }
    }

    Ok(Expr::record(record))
}

/// A single `=`, not the start of `==`
fn definition_sign(input: &mut Input<'_>) -> PResult<()> {
    if input.starts_with("==") {
        return Err(ContextError::new());
    }
    lit("=").void().parse_next(input)
}

fn define(
    input: &mut Input<'_>,
    record: &mut RecordExpr,
    name: AttrName,
    value: ExprRef,
) -> PResult<()> {
    match record.insert(name, value) {
        Ok(()) => Ok(()),
        Err(e) => fail_with(input, e),
    }
}
