use super::{error_reason, value};
use classad_ast::Value;
use pretty_assertions::assert_eq;
use rstest::rstest;

// ============================================================================
// Numbers
// ============================================================================

#[rstest]
#[case("1 + 1.5", Value::real(2.5))]
#[case("5 / 2", Value::integer(2))]
#[case("5.0 / 2", Value::real(2.5))]
#[case("-7 % 3", Value::integer(-1))]
#[case("2 * 3 - 4", Value::integer(2))]
#[case("9223372036854775807 + 1", Value::integer(i64::MIN))]
#[case("-(-9223372036854775808)", Value::integer(i64::MIN))]
#[case("+2.5", Value::real(2.5))]
#[case("- 4", Value::integer(-4))]
fn test_numeric_results(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(value(text), expected);
}

#[rstest]
#[case("5 % 0")]
#[case("5 / 0")]
#[case("1.5 / 0")]
fn test_division_by_zero_is_an_error(#[case] text: &str) {
    assert_eq!(error_reason(text), "division by zero");
}

#[rstest]
#[case("\"a\" + 1", "type error: string + integer")]
#[case("true * 2", "type error: boolean * integer")]
#[case("{1} + 1", "+ applied to List or ClassAd")]
#[case("-\"x\"", "Unary - of string value")]
#[case("+true", "Unary + of boolean value")]
fn test_type_errors(#[case] text: &str, #[case] reason: &str) {
    assert_eq!(error_reason(text), reason);
}

// ============================================================================
// Strictness
// ============================================================================

#[test]
fn test_undefined_propagates() {
    assert!(value("undefined + 1").is_undefined());
    assert!(value("1 - undefined").is_undefined());
    assert!(value("-undefined").is_undefined());
}

#[test]
fn test_error_dominates_undefined() {
    assert!(value("undefined * error").is_error());
    assert!(value("error * undefined").is_error());
}

// ============================================================================
// Times
// ============================================================================

#[test]
fn test_time_arithmetic() {
    assert_eq!(
        value("absTime(\"2024-01-02T00:00:00Z\") - absTime(\"2024-01-01T00:00:00Z\")"),
        Value::rel_time(86_400_000)
    );
    assert_eq!(
        value("absTime(\"2024-01-01T00:00:00+02:00\") + relTime(\"1:00:00\")"),
        Value::abs_time(1_704_060_000_000 + 3_600_000, 7200)
    );
    assert_eq!(
        value("relTime(\"1:00\") - relTime(\"30\")"),
        Value::rel_time(30_000)
    );
    assert_eq!(value("-relTime(\"5\")"), Value::rel_time(-5_000));
}

#[rstest]
#[case("absTime(\"2024-01-01T00:00:00Z\") + absTime(\"2024-01-01T00:00:00Z\")")]
#[case("relTime(\"5\") - absTime(\"2024-01-01T00:00:00Z\")")]
#[case("relTime(\"5\") * 2")]
fn test_time_type_errors(#[case] text: &str) {
    assert!(error_reason(text).starts_with("type error:"));
}
