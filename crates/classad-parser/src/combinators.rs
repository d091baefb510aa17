//! Lexical building blocks for the expression parser
//!
//! Every parser here works on a plain `&str` and reports failure through
//! winnow's `ContextError`. Decoding failures that carry their own
//! diagnostic (bad escapes, oversized integers, reserved names) are attached
//! as the error's cause so the caller can surface them unchanged.

use classad_ast::{AttrName, Expr, ExprRef};
use classad_diagnostics::{CAD0009, ClassAdError};
use classad_types::{parse_real, unquote_string};
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{delimited, empty, opt, preceded};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::{literal, one_of, take_till, take_until, take_while};

pub type Input<'a> = &'a str;
pub type PResult<T> = Result<T, ContextError>;

// === Whitespace and comments ===

/// Skip whitespace, `// line` comments and `/* block */` comments
pub fn ws(input: &mut Input<'_>) -> PResult<()> {
    loop {
        spaces(input)?;
        if input.starts_with("//") {
            line_comment(input)?;
        } else if input.starts_with("/*") {
            block_comment(input)?;
        } else {
            return Ok(());
        }
    }
}

fn spaces<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    multispace0.parse_next(input)
}

fn line_comment<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    preceded("//", take_till(0.., '\n')).parse_next(input)
}

fn block_comment<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    let body = delimited("/*", take_until(0.., "*/"), "*/").parse_next(input);
    if body.is_err() {
        // Unterminated: report at end of input
        *input = &input[input.len()..];
    }
    body
}

// === Tokens ===

/// An exact piece of punctuation
pub fn lit<'a>(token: &'static str) -> impl Parser<Input<'a>, &'a str, ContextError> {
    literal(token)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn identifier<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
        .verify(|name: &str| !name.starts_with(|c: char| c.is_ascii_digit()))
        .parse_next(input)
}

/// A whole word matching `word` without regard to case
pub fn keyword<'a>(word: &'static str) -> impl Parser<Input<'a>, &'a str, ContextError> {
    move |input: &mut Input<'a>| {
        let checkpoint = *input;
        let name = identifier(input)?;
        if name.eq_ignore_ascii_case(word) {
            Ok(name)
        } else {
            *input = checkpoint;
            Err(ContextError::new())
        }
    }
}

/// Fail with `err` as the cause
pub fn fail_with<T>(input: &mut Input<'_>, err: ClassAdError) -> PResult<T> {
    empty
        .try_map(|()| Err::<T, _>(err.clone()))
        .parse_next(input)
}

// === Literals ===

/// The body of a quoted token up to (not including) the closing `quote`
///
/// Backslash escapes are skipped over but left undecoded.
fn quoted_body<'a>(quote: char) -> impl Parser<Input<'a>, &'a str, ContextError> {
    move |input: &mut Input<'a>| {
        let mut escaped = false;
        for (i, c) in input.char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                c if c == quote => {
                    let (body, rest) = input.split_at(i);
                    *input = rest;
                    return Ok(body);
                }
                _ => {}
            }
        }
        *input = &input[input.len()..];
        Err(ContextError::new())
    }
}

/// `"text"` with backslash escapes
pub fn string_literal(input: &mut Input<'_>) -> PResult<String> {
    delimited('"', quoted_body('"'), '"')
        .try_map(unquote_string)
        .parse_next(input)
}

/// A plain identifier or a quoted name such as `'weird name'`
pub fn attr_name(input: &mut Input<'_>) -> PResult<AttrName> {
    if input.starts_with('\'') {
        delimited('\'', quoted_body('\''), '\'')
            .try_map(|body: &str| AttrName::from_text(&format!("'{body}'")))
            .parse_next(input)
    } else {
        identifier.map(AttrName::new).parse_next(input)
    }
}

/// The text of a numeric literal: digits, an optional fraction and an
/// optional exponent
fn number_text<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    let start = *input;
    let scanned: PResult<()> = (
        digit1,
        opt(preceded('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .void()
        .parse_next(input);
    scanned.map(|()| &start[..start.len() - input.len()])
}

/// A numeric literal, negated when it followed a unary minus
pub fn number_literal<'a>(negative: bool) -> impl Parser<Input<'a>, ExprRef, ContextError> {
    number_text.try_map(move |text: &str| number_value(text, negative))
}

fn number_value(text: &str, negative: bool) -> Result<ExprRef, ClassAdError> {
    if text.contains(['.', 'e', 'E']) {
        let d = parse_real(text)?;
        return Ok(Expr::real(if negative { -d } else { d }));
    }
    let signed = if negative {
        format!("-{text}")
    } else {
        text.to_string()
    };
    signed.parse::<i64>().map(Expr::integer).map_err(|_| {
        ClassAdError::parse(
            CAD0009,
            format!("integer literal {signed} is out of range"),
            text,
        )
    })
}
