//! Canonical text for real numbers

use classad_diagnostics::{CAD0001, ClassAdError, Result};

/// Format a real in the canonical scientific notation
///
/// The mantissa always carries fifteen fractional digits and the exponent
/// an explicit sign and at least two digits, e.g. `2.500000000000000E+00`.
/// Reals whose sixteen-digit form would overflow get one digit more.
/// Zeros print as `0.0`/`-0.0` and the non-finite values as calls to
/// `real()` so that the text parses back to the same value.
pub fn format_real(d: f64) -> String {
    if d.is_nan() {
        return "real(\"NaN\")".to_string();
    }
    if d.is_infinite() {
        return if d < 0.0 {
            "real(\"-INF\")".to_string()
        } else {
            "real(\"INF\")".to_string()
        };
    }
    if d == 0.0 {
        return if d.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let text = scientific(d, 15);
    // Rounded to sixteen digits the largest reals would read back as infinite
    if d.abs() >= 1.0e308 && !text.parse::<f64>().is_ok_and(f64::is_finite) {
        return scientific(d, 16);
    }
    text
}

fn scientific(d: f64, digits: usize) -> String {
    let text = format!("{d:.digits$e}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{:02}", exponent.abs())
}

/// Parse the text of a real number
///
/// Accepts `INF`, `-INF` and `NaN` in any case, and anything Rust's float
/// parser accepts. Surrounding whitespace is ignored.
pub fn parse_real(s: &str) -> Result<f64> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("inf") || t.eq_ignore_ascii_case("+inf") {
        return Ok(f64::INFINITY);
    }
    if t.eq_ignore_ascii_case("-inf") {
        return Ok(f64::NEG_INFINITY);
    }
    if t.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    // The float parser also knows "infinity"; only the short forms are legal
    if t.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) {
        return Err(ill_formed(s));
    }
    t.parse::<f64>().map_err(|_| ill_formed(s))
}

fn ill_formed(s: &str) -> ClassAdError {
    ClassAdError::parse(CAD0001, format!("ill-formed real \"{s}\""), s)
}
