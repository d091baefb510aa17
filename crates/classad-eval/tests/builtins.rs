//! Tests for the standard function library, called from parsed text
//!
//! Covers:
//! - Strict dispatch: Error and Undefined arguments, arity, unknown names
//! - Non-strict predicates and list membership
//! - Conversions, rounding, strings, lists, patterns and times
//! - Registering a custom function

use classad_ast::{Expr, ExprRef, Value};
use classad_eval::{Arity, Env, EvalError, Evaluator, FunctionDefinition, FunctionRegistry};
use classad_parser::{parse_expression, parse_record};
use pretty_assertions::assert_eq;
use rstest::rstest;

const AD: &str = r#"[
    Name = "slot1@node7";
    Memory = 2048;
    Load = 0.25;
    Tags = {"gpu", "Linux", 3};
    Start = "2024-03-01T12:00:00+01:00";
    Nested = [Inner = 1];
    Loop = Loop
]"#;

fn eval(text: &str) -> ExprRef {
    let ad = parse_record(AD).unwrap_or_else(|e| panic!("Failed to parse ad: {}", e));
    let expr =
        parse_expression(text).unwrap_or_else(|e| panic!("Failed to parse '{}': {}", text, e));
    Evaluator::new().evaluate(&expr, &mut Env::with_record(ad))
}

fn value(text: &str) -> Value {
    eval(text)
        .value()
        .cloned()
        .unwrap_or_else(|| panic!("Expected a constant from '{}'", text))
}

fn error_reason(text: &str) -> String {
    match value(text) {
        Value::Error(reason) => reason.to_string(),
        other => panic!("Expected an error from '{}', got: {}", text, other),
    }
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_function_names_ignore_case() {
    assert_eq!(value("STRCAT(\"a\", \"b\")"), Value::string("ab"));
    assert_eq!(value("toupper(\"a\")"), Value::string("A"));
}

#[rstest]
#[case("nosuch(1)", "unknown function nosuch")]
#[case("strcmp(\"a\")", "wrong number of args to strcmp")]
#[case("time(1)", "wrong number of args to time")]
#[case("substr(\"abc\", \"1\")", "substr: arg 2 must be int, not string")]
fn test_dispatch_errors(#[case] text: &str, #[case] reason: &str) {
    assert_eq!(error_reason(text), reason);
}

#[test]
fn test_strict_arguments_propagate() {
    assert!(value("strcat(\"a\", Missing)").is_undefined());
    assert!(value("strcat(Missing, 1 / 0)").is_error());
    assert_eq!(error_reason("size(1 / 0)"), "division by zero");
}

#[test]
fn test_custom_function() {
    let mut registry = FunctionRegistry::with_builtins();
    let double = FunctionDefinition::strict("double", Arity::Fixed(1), |_, args| {
        match args[0].value() {
            Some(Value::Integer(i)) => Ok(Expr::integer(i * 2)),
            _ => Err(EvalError::invalid_argument("double", "not an integer")),
        }
    });
    assert!(registry.register(double));

    let evaluator = Evaluator::with_registry(registry);
    let call = parse_expression("Double(21)").unwrap();
    assert_eq!(evaluator.evaluate_top(&call).value(), Some(&Value::integer(42)));

    let bad = parse_expression("double(\"x\")").unwrap();
    assert_eq!(
        evaluator.evaluate_top(&bad).value().and_then(Value::reason),
        Some("double: not an integer")
    );
}

// ============================================================================
// Type predicates
// ============================================================================

#[rstest]
#[case("isUndefined(Missing)", true)]
#[case("isUndefined(Memory)", false)]
#[case("isError(1 / 0)", true)]
#[case("isString(Name)", true)]
#[case("isInteger(Memory)", true)]
#[case("isReal(Load)", true)]
#[case("isBoolean(Memory > 1)", true)]
#[case("isList(Tags)", true)]
#[case("isClassad(Nested)", true)]
#[case("isAbstime(absTime(Start))", true)]
#[case("isReltime(relTime(90))", true)]
#[case("isUndefined(Loop)", true)]
fn test_predicates(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(value(text), Value::boolean(expected), "{text}");
}

// ============================================================================
// Conversions and rounding
// ============================================================================

#[rstest]
#[case("int(Load * 10)", Value::integer(2))]
#[case("int(\"12.9\")", Value::integer(12))]
#[case("real(Memory)", Value::real(2048.0))]
#[case("string(Memory)", Value::string("2048"))]
#[case("string(Tags)", Value::string("{\"gpu\",\"Linux\",3}"))]
#[case("floor(-1.5)", Value::integer(-2))]
#[case("ceiling(1.2)", Value::integer(2))]
#[case("round(2.5)", Value::integer(3))]
#[case("round(Memory)", Value::integer(2048))]
fn test_conversions(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(value(text), expected);
}

#[test]
fn test_bad_conversion() {
    assert_eq!(error_reason("int(\"lots\")"), "int: ill-formed integer lots");
}

#[test]
fn test_random_stays_in_range() {
    for _ in 0..50 {
        let Value::Integer(i) = value("random(6)") else {
            panic!("random(6) should be an integer");
        };
        assert!((0..6).contains(&i));
        let Value::Real(d) = value("random()") else {
            panic!("random() should be a real");
        };
        assert!((0.0..1.0).contains(&d));
    }
}

// ============================================================================
// Strings
// ============================================================================

#[rstest]
#[case("strcat(Name, \"/\", Memory)", Value::string("slot1@node7/2048"))]
#[case("substr(Name, 6)", Value::string("node7"))]
#[case("substr(Name, -5, 4)", Value::string("node"))]
#[case("strcmp(\"a\", \"B\")", Value::integer(1))]
#[case("stricmp(\"a\", \"B\")", Value::integer(-1))]
#[case("stricmp(\"x\", \"X\")", Value::integer(0))]
#[case("toUpper(Name)", Value::string("SLOT1@NODE7"))]
#[case("toLower(\"MiXeD\")", Value::string("mixed"))]
#[case("size(Name)", Value::integer(11))]
#[case("size(Tags)", Value::integer(3))]
#[case("size(Nested)", Value::integer(1))]
fn test_strings(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(value(text), expected);
}

// ============================================================================
// Lists
// ============================================================================

#[rstest]
#[case("sum({1, 2, 3})", Value::integer(6))]
#[case("sum({1, 2.5})", Value::real(3.5))]
#[case("sum({})", Value::integer(0))]
#[case("avg({1, 2})", Value::real(1.5))]
#[case("min({3, 1, 2})", Value::integer(1))]
#[case("max({3, 1.5})", Value::real(3.0))]
#[case("member(\"linux\", Tags)", Value::boolean(true))]
#[case("member(3.0, Tags)", Value::boolean(true))]
#[case("identicalMember(\"linux\", Tags)", Value::boolean(false))]
#[case("identicalMember(\"Linux\", Tags)", Value::boolean(true))]
#[case("anycompare(\">\", {1, 5, 9}, 8)", Value::boolean(true))]
#[case("anycompare(\"==\", {1, \"x\"}, 2)", Value::boolean(false))]
#[case("allcompare(\"<\", {1, 5}, 8)", Value::boolean(true))]
#[case("allcompare(\"<\", {1, 9}, 8)", Value::boolean(false))]
fn test_lists(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(value(text), expected);
}

#[test]
fn test_min_of_empty_list_is_undefined() {
    assert!(value("min({})").is_undefined());
}

#[rstest]
#[case("sum({1, \"2\"})", "sum: non-number in list: \"2\"")]
#[case("member({1}, Tags)", "member: arg 1 must be a constant, not list")]
#[case("member(1, 2)", "member: arg 2 must be list, not integer")]
#[case("anycompare(\"~\", {1}, 1)", "anycompare: unrecognized operator \"~\"")]
fn test_list_errors(#[case] text: &str, #[case] reason: &str) {
    assert_eq!(error_reason(text), reason);
}

// ============================================================================
// Patterns
// ============================================================================

#[rstest]
#[case("regexp(\"^slot[0-9]+@\", Name)", true)]
#[case("regexp(\"NODE\", Name)", false)]
#[case("regexp(\"NODE\", Name, \"i\")", true)]
#[case("regexpMember(\"^L\", Tags)", true)]
#[case("glob(Name, \"slot*@node?\")", true)]
#[case("glob(Name, \"SLOT*\")", false)]
#[case("iglob(\"SLOT1\", \"slot*\")", true)]
fn test_patterns(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(value(text), Value::boolean(expected), "{text}");
}

#[test]
fn test_bad_regex_names_the_pattern() {
    let reason = error_reason("regexp(\"(\", Name)");
    assert!(reason.starts_with("regexp: bad pattern '('"), "{reason}");
}

// ============================================================================
// Times
// ============================================================================

#[rstest]
#[case("absTime(Start)", Value::abs_time(1_709_290_800_000, 3600))]
#[case("absTime(0, -18000)", Value::abs_time(0, -18_000))]
#[case("absTime(1.5, 0)", Value::abs_time(1_500, 0))]
#[case("relTime(90)", Value::rel_time(90_000))]
#[case("relTime(\"1:30\")", Value::rel_time(90_000))]
#[case("interval(3661)", Value::string("1:01:01"))]
#[case("formatTime(absTime(Start), \"%Y-%m-%d %H:%M\")", Value::string("2024-03-01 12:00"))]
#[case("gmtTimeString(0)", Value::string("Thu Jan  1 00:00:00 UTC 1970"))]
#[case("int(absTime(Start))", Value::integer(1_709_290_800))]
fn test_times(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(value(text), expected);
}

#[test]
fn test_split_time() {
    let parts = eval("splitTime(absTime(Start))");
    let record = parts.as_record().expect("a record");
    let field = |name: &str| record.get_str(name).and_then(|e| e.value()).cloned();
    assert_eq!(field("Type"), Some(Value::string("AbsoluteTime")));
    assert_eq!(field("Year"), Some(Value::integer(2024)));
    assert_eq!(field("Hours"), Some(Value::integer(12)));
    assert_eq!(field("Offset"), Some(Value::integer(3600)));

    let parts = eval("splitTime(relTime(\"1+02:03:04\"))");
    let record = parts.as_record().expect("a record");
    assert_eq!(
        record.get_str("Days").and_then(|e| e.value()),
        Some(&Value::integer(1))
    );
    assert_eq!(
        record.get_str("Seconds").and_then(|e| e.value()),
        Some(&Value::integer(4))
    );
}

#[test]
fn test_time_is_recent() {
    let Value::Integer(now) = value("time()") else {
        panic!("time() should be an integer");
    };
    assert!(now > 1_700_000_000);
}

#[rstest]
#[case("absTime(\"yesterday\")")]
#[case("absTime(0, 90000)")]
#[case("formatTime(0, \"%Q\")")]
#[case("splitTime(3)")]
fn test_time_errors(#[case] text: &str) {
    assert!(value(text).is_error(), "{text}");
}
