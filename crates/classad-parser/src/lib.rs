//! ClassAd parser using Winnow
//!
//! Reads the canonical text syntax into expression trees: records
//! `[a = 1; b = "x"]`, lists `{1, 2}`, selection, subscripts, conditionals,
//! calls, quoted attribute names and every operator at its precedence level.
//! Whitespace and `//` or `/* */` comments may appear between tokens.

mod combinators;
mod expression;

use classad_ast::{Expr, ExprRef};
use classad_diagnostics::{CAD0006, CAD0007, ClassAdError, Result};
use combinators::{Input, ws};
use expression::expression_parser;
use winnow::error::ContextError;

/// Parse a single expression; the whole input must be consumed
pub fn parse_expression(source: &str) -> Result<ExprRef> {
    let mut input: Input<'_> = source;

    let parsed = expression_parser(&mut input).and_then(|expr| {
        ws(&mut input)?;
        Ok(expr)
    });
    match parsed {
        Ok(expr) if input.is_empty() => Ok(expr),
        Ok(_) => Err(syntax_error(source, input)),
        Err(e) => {
            let err = parse_failure(&e, source, input);
            log::debug!("parse failed: {err}");
            Err(err)
        }
    }
}

/// Parse text that must denote a record, such as one ad
pub fn parse_record(source: &str) -> Result<ExprRef> {
    let expr = parse_expression(source)?;
    match expr.as_ref() {
        Expr::Record(_) => Ok(expr),
        other => Err(ClassAdError::parse(
            CAD0006,
            format!("expected a record, found {}", other.type_name()),
            source,
        )),
    }
}

/// The decoding failure carried by `err`, or a syntax error at the point
/// where parsing stopped
fn parse_failure(err: &ContextError, source: &str, rest: &str) -> ClassAdError {
    err.cause()
        .and_then(|cause| cause.downcast_ref::<ClassAdError>())
        .cloned()
        .unwrap_or_else(|| syntax_error(source, rest))
}

fn syntax_error(source: &str, rest: &str) -> ClassAdError {
    let rest = rest.trim_start();
    let offset = source.len() - rest.len();
    match rest.chars().next() {
        None => ClassAdError::parse(CAD0007, "unexpected end of input", source),
        Some(c) => ClassAdError::parse(
            CAD0006,
            format!("unexpected {c:?} at offset {offset}"),
            source,
        ),
    }
}
