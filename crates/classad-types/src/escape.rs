//! Backslash escapes for quoted strings and attribute names

use classad_diagnostics::{CAD0002, ClassAdError, Result};
use std::fmt;

/// Write `s` surrounded by `quote`, escaping the quote character and
/// anything that is not printable ASCII
///
/// Control characters with a letter escape use it (`\n \t \b \r \f`), a
/// backslash doubles, and the remaining characters below U+0100 that are
/// outside `' '..='~'` become three octal digits. Characters above U+00FF
/// have no octal form and are written as they are.
pub fn write_escaped<W: fmt::Write>(out: &mut W, s: &str, quote: char) -> fmt::Result {
    out.write_char(quote)?;
    for c in s.chars() {
        if c == quote {
            out.write_char('\\')?;
        }
        match c {
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\u{8}' => out.write_str("\\b")?,
            '\r' => out.write_str("\\r")?,
            '\u{c}' => out.write_str("\\f")?,
            '\\' => out.write_str("\\\\")?,
            ' '..='~' => out.write_char(c)?,
            c if (c as u32) < 0o400 => write!(out, "\\{:03o}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char(quote)
}

/// Quote and escape `s`; see [`write_escaped`]
pub fn escape_string(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    // Writing to a String cannot fail
    let _ = write_escaped(&mut out, s, quote);
    out
}

/// Replace the backslash escapes in `s`, the text between the quotes
///
/// This is the inverse of [`escape_string`]. An octal escape takes up to
/// three digits when the first is 0-3 and up to two otherwise. A NUL
/// produced by an octal escape, an unknown escape letter, or a backslash at
/// the very end are failures.
pub fn unquote_string(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            return Err(bad_escape(s, "backslash at end of string"));
        };
        match next {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'r' => out.push('\r'),
            'f' => out.push('\u{c}'),
            '\\' | '\'' | '"' => out.push(next),
            '0'..='7' => {
                let mut val = next.to_digit(8).unwrap_or(0);
                let more = if val <= 3 { 2 } else { 1 };
                for _ in 0..more {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            val = (val << 3) + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                if val == 0 {
                    return Err(bad_escape(s, "null character"));
                }
                // At most 0o377, always a valid scalar value
                out.push(char::from(val as u8));
            }
            other => {
                return Err(bad_escape(s, &format!("unknown escape \\{other}")));
            }
        }
    }
    Ok(out)
}

fn bad_escape(s: &str, what: &str) -> ClassAdError {
    ClassAdError::parse(
        CAD0002,
        format!("invalid string \"{s}\": {what}"),
        s,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "\"plain\"")]
    #[case("a\"b", "\"a\\\"b\"")]
    #[case("tab\there", "\"tab\\there\"")]
    #[case("line\n", "\"line\\n\"")]
    #[case("back\\slash", "\"back\\\\slash\"")]
    #[case("\u{7}", "\"\\007\"")]
    #[case("\u{7f}", "\"\\177\"")]
    #[case("caf\u{e9}", "\"caf\\351\"")]
    fn test_escape(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_string(raw, '"'), expected);
    }

    #[test]
    fn test_escape_single_quote_only_when_quoting_with_it() {
        assert_eq!(escape_string("it's", '\''), "'it\\'s'");
        assert_eq!(escape_string("it's", '"'), "\"it's\"");
    }

    #[rstest]
    #[case("a\\nb", "a\nb")]
    #[case("\\101\\102", "AB")]
    #[case("\\1011", "A1")]
    #[case("\\477", "\u{27}7")]
    #[case("\\7", "\u{7}")]
    #[case("\\'\\\"", "'\"")]
    fn test_unquote(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(unquote_string(body).unwrap(), expected);
    }

    #[rstest]
    #[case("trailing\\")]
    #[case("nul\\0")]
    #[case("nul\\000")]
    #[case("bad\\q")]
    fn test_unquote_rejects(#[case] body: &str) {
        assert_eq!(unquote_string(body).unwrap_err().code(), CAD0002);
    }

    proptest! {
        #[test]
        fn prop_unquote_inverts_escape(s in "[^\\x00]{0,40}") {
            let quoted = escape_string(&s, '"');
            let body = &quoted[1..quoted.len() - 1];
            prop_assert_eq!(unquote_string(body).unwrap(), s);
        }
    }
}
