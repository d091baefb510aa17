use super::{error_reason, value};
use classad_ast::Value;
use rstest::rstest;

#[rstest]
#[case("5 & 3", Value::integer(1))]
#[case("5 | 3", Value::integer(7))]
#[case("5 ^ 3", Value::integer(6))]
#[case("true ^ false", Value::boolean(true))]
#[case("true & false", Value::boolean(false))]
#[case("1 << 65", Value::integer(2))]
#[case("-16 >> 2", Value::integer(-4))]
#[case("-1 >>> 60", Value::integer(15))]
#[case("~0", Value::integer(-1))]
fn test_bit_operations(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(value(text), expected);
}

#[rstest]
#[case("1 | true", "type error: integer|boolean")]
#[case("1.5 << 1", "type error: real<<integer")]
#[case("~1.5", "Unary ~ of real value")]
fn test_bit_type_errors(#[case] text: &str, #[case] reason: &str) {
    assert_eq!(error_reason(text), reason);
}
