//! Tests for parsing compound expressions
//!
//! Covers:
//! - Records and lists, with comments and trailing separators
//! - Selection, subscripts and calls
//! - Operator precedence and associativity
//! - Syntax errors and their codes

use classad_ast::{AttrName, BinaryOp, Expr, UnaryOp, Value};
use classad_diagnostics::{CAD0005, CAD0006, CAD0007, CAD0008};
use classad_parser::{parse_expression, parse_record};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn printed(input: &str) -> String {
    parse_expression(input)
        .unwrap_or_else(|e| panic!("Failed to parse '{}': {}", input, e))
        .to_string()
}

#[test]
fn test_record_with_trailing_separator() {
    let expr = parse_record("[ a = 1; B = \"x\"; ]").unwrap();
    let record = expr.as_record().unwrap();
    assert_eq!(record.len(), 2);
    assert_eq!(record.get_str("b").unwrap().value(), Some(&Value::string("x")));
    assert_eq!(expr.to_string(), "[a=1;B=\"x\"]");
}

#[test]
fn test_nested_record_and_list() {
    assert_eq!(
        printed("[x = [y = {1, 2, [z = 3]}]]"),
        "[x=[y={1,2,[z=3]}]]"
    );
    assert_eq!(printed("{}"), "{}");
    assert_eq!(printed("[]"), "[]");
}

#[test]
fn test_comments_between_tokens() {
    let text = "[\n  // the job\n  Owner = \"ann\"; /* size */ Memory = 2048\n]";
    assert_eq!(printed(text), "[Owner=\"ann\";Memory=2048]");
}

#[test]
fn test_quoted_attribute_names() {
    let expr = parse_record("['weird name' = 1; 'true' = 2]").unwrap();
    let record = expr.as_record().unwrap();
    assert!(record.contains(&AttrName::new("weird name")));
    assert!(record.contains(&AttrName::new("TRUE")));
    assert_eq!(expr.to_string(), "['weird name'=1;'true'=2]");
}

#[rstest]
#[case("a.b.c", "a.b.c")]
#[case("a[0].b", "a[0].b")]
#[case("{1, 2}[1 + 0]", "{1,2}[(1+0)]")]
#[case("strcat(\"a\", b , c.d)", "strcat(\"a\",b,c.d)")]
#[case("time()", "time()")]
#[case("x . 'odd name'", "x.'odd name'")]
fn test_references_and_calls(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(printed(text), expected);
}

#[rstest]
#[case("1 + 2 * 3", "(1+(2*3))")]
#[case("(1 + 2) * 3", "((1+2)*3)")]
#[case("a && b || c && d", "((a&&b)||(c&&d))")]
#[case("a || b | c", "(a||(b|c))")]
#[case("a & b && c", "((a&b)&&c)")]
#[case("!a && ~b", "((!a)&&(~b))")]
#[case("- -a", "(-(-a))")]
#[case("a != b == c", "((a!=b)==c)")]
#[case("a =?= b", "")]
#[case("x isnt undefined", "(x isnt UNDEFINED)")]
#[case("a ? b : c", "(a?b:c)")]
#[case("a || b ? 1 : 2", "((a||b)?1:2)")]
#[case("a ? b ? 1 : 2 : 3", "(a?(b?1:2):3)")]
fn test_precedence(#[case] text: &str, #[case] expected: &str) {
    if expected.is_empty() {
        assert!(parse_expression(text).is_err());
    } else {
        assert_eq!(printed(text), expected);
    }
}

#[test]
fn test_tree_shape() {
    let expr = parse_expression("a - 1 < b").unwrap();
    let Expr::Binary(cmp) = expr.as_ref() else {
        panic!("Expected a comparison, got: {expr:?}");
    };
    assert_eq!(cmp.op, BinaryOp::Less);
    let Expr::Binary(sub) = cmp.left.as_ref() else {
        panic!("Expected a subtraction, got: {:?}", cmp.left);
    };
    assert_eq!(sub.op, BinaryOp::Subtract);

    let neg = parse_expression("-x").unwrap();
    assert!(matches!(neg.as_ref(), Expr::Unary(u) if u.op == UnaryOp::Minus));
}

#[test]
fn test_printed_trees_read_back() {
    let texts = [
        "[Requirements = other.Memory >= 1024 && other.Arch == \"X86_64\"; Rank = -other.LoadAvg]",
        "{a ? b : c, f(x, y)[0], 'a b'.c, (x is undefined)}",
        "[a = 1 << 3 >>> 1; b = ~a ^ 7 | a & 1; c = a % 2 / 3.5]",
    ];
    for text in texts {
        let first = parse_expression(text).unwrap();
        let second = parse_expression(&first.to_string()).unwrap();
        assert!(first.same_as(&second), "{first} vs {second}");
    }
}

#[rstest]
#[case("", CAD0007)]
#[case("1 +", CAD0007)]
#[case("[a = 1", CAD0007)]
#[case("{1, 2", CAD0007)]
#[case("/* open", CAD0007)]
#[case("1 2", CAD0006)]
#[case("a.", CAD0007)]
#[case("[a 1]", CAD0006)]
#[case("[a == 1]", CAD0006)]
#[case("f(1,)", CAD0006)]
#[case("is", CAD0006)]
#[case("@", CAD0006)]
#[case("[parent = 1]", CAD0008)]
#[case("[a = 1; '' = 2]", CAD0005)]
fn test_syntax_errors(#[case] text: &str, #[case] code: classad_diagnostics::ErrorCode) {
    let err = parse_expression(text).unwrap_err();
    assert_eq!(err.code(), code, "{err}");
}

#[test]
fn test_parse_record_rejects_other_expressions() {
    let err = parse_record("{1}").unwrap_err();
    assert_eq!(err.code(), CAD0006);
    assert!(err.message().contains("list"));
}
