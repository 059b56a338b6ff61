mod common;

use common::{eval_number, eval_value, runtime_error};

#[test]
fn test_named_function_call() {
    assert_eq!(eval_number("function add(a, b) a + b; add(2, 3);"), 5.0);
}

#[test]
fn test_definition_yields_function_value() {
    assert_eq!(eval_value("function f() 1;").to_string(), "<function f>");
    assert_eq!(eval_value("function (x) x;").to_string(), "<function <anonymous>>");
}

#[test]
fn test_anonymous_function_called_in_place() {
    assert_eq!(eval_number("(function (x) x * 2)(4);"), 8.0);
}

#[test]
fn test_functions_as_arguments() {
    let source = "function apply(f, x) f(x); apply(function (n) n + 1, 41);";
    assert_eq!(eval_number(source), 42.0);
}

#[test]
fn test_closures_capture_their_scope() {
    let source = "function make(n) function (m) n + m; (make(10))(5);";
    assert_eq!(eval_number(source), 15.0);
}

#[test]
fn test_recursion() {
    let source = "function fact(n) if (n < 2) 1 else n * fact(n - 1); fact(5);";
    assert_eq!(eval_number(source), 120.0);
}

#[test]
fn test_body_sees_globals_bound_after_definition() {
    assert_eq!(eval_number("function f() later; number later = 3; f();"), 3.0);
}

#[test]
fn test_parameters_shadow_globals() {
    assert_eq!(eval_number("number x = 1; function f(x) x * 10; f(4);"), 40.0);
    assert_eq!(eval_number("number x = 1; function f(x) x; f(9); x;"), 1.0);
}

#[test]
fn test_parameters_do_not_leak() {
    let error = runtime_error("function f(a) a; f(1); a;");
    assert_eq!(error.details, "a is not defined");
}

#[test]
fn test_declarations_in_body_stay_local() {
    let error = runtime_error("function f() number inner = 2; f(); inner;");
    assert_eq!(error.details, "inner is not defined");
}

#[test]
fn test_arity_is_checked() {
    let error = runtime_error("function f(a) a; f(1, 2);");
    assert_eq!(error.details, "Function 'f' expects 1 argument(s) but got 2");

    let error = runtime_error("(function (a, b) a)(1);");
    assert_eq!(error.details, "Function '<anonymous>' expects 2 argument(s) but got 1");
}

#[test]
fn test_only_functions_are_callable() {
    let error = runtime_error("number x = 1; x(2);");
    assert_eq!(error.details, "'Number' is not callable");

    let error = runtime_error("\"s\"();");
    assert_eq!(error.details, "'String' is not callable");
}

#[test]
fn test_arguments_evaluated_before_call() {
    let error = runtime_error("function f(a) a; f(1 / 0);");
    assert_eq!(error.details, "Cannot divide by 0");
    assert_eq!(error.traceback().len(), 1);
}

#[test]
fn test_call_without_value() {
    let error = runtime_error("function f() if (false) 1; f() + 1;");
    assert_eq!(error.details, "Expression does not produce a value");
}

#[test]
fn test_function_result_can_be_indexed() {
    assert_eq!(eval_number("function pair() [4, 5]; pair()[1];"), 5.0);
}

#[test]
fn test_functions_only_compare_with_functions() {
    let error = runtime_error("function f() 1; f != 1;");
    assert_eq!(
        error.details,
        "The '!=' operator cannot be applied to operands of type 'Function' and 'Number'"
    );
}

#[test]
fn test_closure_returns_array_of_captured_values() {
    let source = "function scale(k) function (x) [x * k]; (scale(3))(4)[0];";
    assert_eq!(eval_number(source), 12.0);
}

#[test]
fn test_deep_non_tail_recursion() {
    let source = "function depth(n) if (n == 0) 0 else 1 + depth(n - 1); depth(190);";
    assert_eq!(eval_number(source), 190.0);
}
