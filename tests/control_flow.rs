mod common;

use common::{eval, eval_number, eval_value, runtime_error};

#[test]
fn test_if_else_picks_branch() {
    assert_eq!(eval_number("if (true) 1 else 2;"), 1.0);
    assert_eq!(eval_number("if (false) 1 else 2;"), 2.0);
}

#[test]
fn test_if_without_else_can_produce_nothing() {
    assert_eq!(eval("if (false) 1;"), None);
    assert_eq!(eval_number("if (true) 1;"), 1.0);
}

#[test]
fn test_only_the_chosen_branch_runs() {
    assert_eq!(eval_number("if (true) 1 else undefined_name;"), 1.0);
    assert_eq!(eval_number("if (false) 1 / 0 else 2;"), 2.0);
}

#[test]
fn test_else_if_chain() {
    let source = "number x = 5;
        if (x < 3) \"small\"
        else if (x < 10) \"medium\"
        else \"large\";";
    assert_eq!(eval_value(source).to_string(), "medium");
}

#[test]
fn test_condition_from_comparison_and_logic() {
    assert_eq!(eval_number("number x = 4; if (x > 1 and x < 5) x else 0;"), 4.0);
    assert_eq!(eval_number("if (not (1 == 2)) 10 else 20;"), 10.0);
}

#[test]
fn test_braced_branches() {
    assert_eq!(eval_number("if (true) {1 + 1} else {0};"), 2.0);
}

#[test]
fn test_declaration_in_branch_binds_in_current_scope() {
    assert_eq!(eval_number("if (true) number y = 4; y;"), 4.0);
}

#[test]
fn test_condition_must_be_boolean() {
    let error = runtime_error("if (1) 2;");
    assert_eq!(error.details, "Condition cannot be of type Number");

    let error = runtime_error("if (\"yes\") 2 else 3;");
    assert_eq!(error.details, "Condition cannot be of type String");
}

#[test]
fn test_conditional_as_operand() {
    assert_eq!(eval_number("1 + if (true) 2 else 3;"), 3.0);
}

#[test]
fn test_missing_value_in_operand_position() {
    let error = runtime_error("number x = if (false) 1;");
    assert_eq!(error.details, "Expression does not produce a value");
}

#[test]
fn test_sequence_value_is_last_statement() {
    assert_eq!(eval_number("1; 2; 3;"), 3.0);
    assert_eq!(eval("1; if (false) 2;"), None);
}
