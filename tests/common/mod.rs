#![allow(dead_code)]

use kestrel::{run, Error, ErrorKind, Value};

pub fn eval(source: &str) -> Option<Value> {
    match run("test", source) {
        Ok(value) => value,
        Err(error) => panic!("`{}` failed:\n{}", source, error.render(false)),
    }
}

pub fn eval_value(source: &str) -> Value {
    eval(source).unwrap_or_else(|| panic!("`{}` produced no value", source))
}

pub fn eval_number(source: &str) -> f64 {
    let value = eval_value(source);
    value
        .as_number()
        .unwrap_or_else(|| panic!("`{}` produced {} instead of a number", source, value.type_name()))
}

pub fn eval_bool(source: &str) -> bool {
    let value = eval_value(source);
    value
        .as_bool()
        .unwrap_or_else(|| panic!("`{}` produced {} instead of a boolean", source, value.type_name()))
}

pub fn eval_error(source: &str) -> Error {
    match run("test", source) {
        Ok(value) => panic!("`{}` should fail but produced {:?}", source, value),
        Err(error) => error,
    }
}

pub fn runtime_error(source: &str) -> Error {
    let error = eval_error(source);
    assert_eq!(error.kind, ErrorKind::RunTime, "`{}` failed with {}", source, error);
    error
}
