use super::{error_reason, value};
use classad_ast::Value;
use rstest::rstest;

#[rstest]
#[case("3 == 3.0", true)]
#[case("2 < 2.5", true)]
#[case("\"Linux\" == \"LINUX\"", true)]
#[case("\"a\" < \"B\"", true)]
#[case("\"b\" >= \"B\"", true)]
#[case("true != false", true)]
#[case("true == true", true)]
#[case("relTime(\"1:00\") > relTime(\"59\")", true)]
#[case("absTime(\"2024-01-01T00:00:00Z\") == absTime(\"2024-01-01T01:00:00+01:00\")", true)]
#[case("real(\"NaN\") == real(\"NaN\")", false)]
fn test_comparisons(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(value(text), Value::boolean(expected), "{text}");
}

#[rstest]
#[case("true < false", "attempt to compare boolean < boolean")]
#[case("1 == \"1\"", "attempt to compare integer == string")]
#[case("absTime(\"2024-01-01T00:00:00Z\") > 0", "type error: timestamp > integer")]
fn test_incomparable(#[case] text: &str, #[case] reason: &str) {
    assert_eq!(error_reason(text), reason);
}

#[test]
fn test_comparison_is_strict_in_undefined() {
    assert!(value("undefined == 1").is_undefined());
    assert!(value("1 != undefined").is_undefined());
}

// ============================================================================
// Identity
// ============================================================================

#[rstest]
#[case("3 is 3", true)]
#[case("3 is 3.0", false)]
#[case("\"abc\" is \"ABC\"", false)]
#[case("\"abc\" isnt \"ABC\"", true)]
#[case("undefined is undefined", true)]
#[case("error is error", true)]
#[case("missing is undefined", true)]
#[case("real(\"NaN\") is real(\"NaN\")", true)]
#[case("absTime(\"2024-01-01T00:00:00Z\") is absTime(\"2024-01-01T01:00:00+01:00\")", false)]
#[case("{1} is {1}", false)]
fn test_identity(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(value(text), Value::boolean(expected), "{text}");
}
