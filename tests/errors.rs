//! Error kinds and messages surfaced by each stage.

mod common;

use common::{eval_error, runtime_error};
use kestrel::ErrorKind;

// =============================================================================
// LEXER
// =============================================================================

#[test]
fn test_illegal_character() {
    let error = eval_error("1 + @;");
    assert_eq!(error.kind, ErrorKind::IllegalChar);
    assert_eq!(error.to_string(), "IllegalCharError: Unexpected character '@'");
    assert_eq!(error.span.start.column, 4);
}

#[test]
fn test_single_pipe_and_ampersand() {
    let error = eval_error("true | false;");
    assert_eq!(error.kind, ErrorKind::ExpectedChar);
    assert_eq!(error.details, "Expected '|' after '|'");

    let error = eval_error("true & false;");
    assert_eq!(error.kind, ErrorKind::ExpectedChar);
    assert_eq!(error.details, "Expected '&' after '&'");
}

#[test]
fn test_lexer_error_wins_over_later_syntax_error() {
    let error = eval_error("1 + ; $");
    assert_eq!(error.kind, ErrorKind::IllegalChar);
}

// =============================================================================
// PARSER
// =============================================================================

#[test]
fn test_missing_operand() {
    let error = eval_error("1 +;");
    assert_eq!(error.kind, ErrorKind::InvalidSyntax);
    assert_eq!(
        error.details,
        "Expected number, string, boolean, identifier, '[', '(', 'if' or 'function'"
    );
}

#[test]
fn test_statement_cannot_start_with_operator() {
    let error = eval_error("* 2;");
    assert_eq!(error.kind, ErrorKind::InvalidSyntax);
    assert_eq!(
        error.details,
        "Expected number, string, boolean, identifier, 'if', 'function', '[', '(', '+', '-' or '!'"
    );
}

#[test]
fn test_every_statement_needs_a_terminator() {
    let error = eval_error("number x = 5");
    assert_eq!(error.kind, ErrorKind::InvalidSyntax);
    assert_eq!(error.details, "Expected ';'");
}

#[test]
fn test_keyword_cannot_be_an_identifier() {
    let error = eval_error("number else = 1;");
    assert_eq!(error.details, "Expected identifier");
}

#[test]
fn test_unclosed_delimiters() {
    assert_eq!(eval_error("(1 + 2;").details, "Expected ')'");
    assert_eq!(eval_error("[1, 2;").details, "Expected ',' or ']'");
    assert_eq!(eval_error("{1;").details, "Expected '}'");
    assert_eq!(eval_error("[1][0;").details, "Expected ']'");
}

#[test]
fn test_empty_source_is_a_syntax_error() {
    assert_eq!(eval_error("").kind, ErrorKind::InvalidSyntax);
    assert_eq!(eval_error("   \n").kind, ErrorKind::InvalidSyntax);
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    let parens = format!("{}1{};", "(".repeat(10_000), ")".repeat(10_000));
    let error = eval_error(&parens);
    assert_eq!(error.kind, ErrorKind::InvalidSyntax);
    assert_eq!(error.details, "Maximum nesting depth exceeded");

    let negations = format!("{}1;", "-".repeat(10_000));
    assert_eq!(eval_error(&negations).details, "Maximum nesting depth exceeded");
}

// =============================================================================
// RUNTIME
// =============================================================================

#[test]
fn test_operator_type_mismatch() {
    let error = runtime_error("1 + true;");
    assert_eq!(
        error.details,
        "The '+' operator cannot be applied to operands of type 'Number' and 'Boolean'"
    );

    let error = runtime_error("\"a\" * \"b\";");
    assert_eq!(
        error.details,
        "The '*' operator cannot be applied to operands of type 'String' and 'String'"
    );

    let error = runtime_error("1 == \"1\";");
    assert_eq!(
        error.details,
        "The '==' operator cannot be applied to operands of type 'Number' and 'String'"
    );
}

#[test]
fn test_logic_on_numbers() {
    let error = runtime_error("1 and 2;");
    assert_eq!(
        error.details,
        "The '&&' operator cannot be applied to operands of type 'Number' and 'Number'"
    );
}

#[test]
fn test_unary_type_mismatch() {
    let error = runtime_error("-true;");
    assert_eq!(
        error.details,
        "The '-' operator cannot be applied to operand of type 'Boolean'"
    );

    let error = runtime_error("not 1;");
    assert_eq!(
        error.details,
        "The '!' operator cannot be applied to operand of type 'Number'"
    );
}

#[test]
fn test_division_by_zero() {
    let error = runtime_error("10 / 0;");
    assert_eq!(error.to_string(), "RunTimeError: Cannot divide by 0");
    assert_eq!(error.span.start.column, 5);

    let error = runtime_error("number zero = 0; 1 / (zero * 3);");
    assert_eq!(error.details, "Cannot divide by 0");
}

#[test]
fn test_type_error_points_at_left_operand() {
    let error = runtime_error("number x = 1;\n\"s\" - x;");
    assert_eq!(error.span.start.line, 1);
    assert_eq!(error.span.start.column, 0);
    assert_eq!(error.span.end.column, 3);
}

#[test]
fn test_left_operand_fails_first() {
    let error = runtime_error("a + b;");
    assert_eq!(error.details, "a is not defined");
}

#[test]
fn test_first_failing_statement_stops_the_run() {
    let error = runtime_error("1 / 0; missing;");
    assert_eq!(error.details, "Cannot divide by 0");
}
