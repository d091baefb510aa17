use super::{error_reason, eval, value};
use classad_ast::Value;
use pretty_assertions::assert_eq;
use rstest::rstest;

const OPERANDS: [&str; 4] = ["false", "undefined", "true", "error"];

fn truth(text: &str) -> char {
    match value(text) {
        Value::Boolean(false) => 'F',
        Value::Undefined(_) => 'U',
        Value::Boolean(true) => 'T',
        Value::Error(_) => 'E',
        other => panic!("Expected a truth value from '{}', got: {}", text, other),
    }
}

// ============================================================================
// Truth tables
// ============================================================================

#[rstest]
#[case("&&", ["FFFF", "FUUE", "FUTE", "EEEE"])]
#[case("||", ["FUTE", "UUTE", "TTTT", "EEEE"])]
fn test_truth_table(#[case] op: &str, #[case] rows: [&str; 4]) {
    for (left, expected) in OPERANDS.iter().zip(rows) {
        let row: String = OPERANDS
            .iter()
            .map(|right| truth(&format!("{left} {op} {right}")))
            .collect();
        assert_eq!(row, expected, "row for {left} {op}");
    }
}

#[test]
fn test_not_table() {
    let row: String = OPERANDS.iter().map(|v| truth(&format!("!{v}"))).collect();
    assert_eq!(row, "TUFE");
}

// ============================================================================
// Non-boolean operands
// ============================================================================

#[rstest]
#[case("1 && true", "&&: argument must be boolean")]
#[case("true || \"yes\"", "||: argument must be boolean")]
#[case("undefined && {1}", "&&: argument must be boolean")]
#[case("!3", "!: argument must be boolean")]
fn test_non_boolean_operands(#[case] text: &str, #[case] reason: &str) {
    assert_eq!(error_reason(text), reason);
}

#[test]
fn test_deciding_side_wins_over_bad_operand() {
    assert_eq!(value("false && 1"), Value::boolean(false));
    assert_eq!(value("true || [a = 1]"), Value::boolean(true));
}

#[test]
fn test_error_operand_keeps_its_reason() {
    let result = eval("true && (1 / 0)");
    assert_eq!(
        result.value().and_then(Value::reason),
        Some("division by zero")
    );
}

#[rstest]
#[case("(1 / 0) && false")]
#[case("(1 / 0) || true")]
fn test_left_error_wins_over_deciding_right_side(#[case] text: &str) {
    assert_eq!(error_reason(text), "division by zero");
}

#[rstest]
#[case("undefined && false", false)]
#[case("undefined || true", true)]
fn test_deciding_right_side_wins_over_undefined(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(value(text), Value::boolean(expected));
}
