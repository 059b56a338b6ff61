use thiserror::Error;

use std::rc::Rc;

use super::environment::SharedTable;
use crate::ast::{BinaryOperator, Node, UnaryOperator};
use crate::value::{Value, ValueKind};

/// Failure of an operator on runtime values. The evaluator attaches the
/// source location and frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    #[error("The '{op}' operator cannot be applied to operands of type '{left}' and '{right}'")]
    Unsupported {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("The '{op}' operator cannot be applied to operand of type '{operand}'")]
    UnsupportedUnary { op: &'static str, operand: &'static str },
    #[error("Cannot divide by 0")]
    DivisionByZero,
    #[error("Index cannot be of type {0}")]
    InvalidIndexType(&'static str),
    #[error("Cannot get index of type {0}")]
    NotIndexable(&'static str),
    #[error("Index out of range")]
    IndexOutOfRange,
}

/// What indexing yields: a finished value for strings, the stored
/// expression and the scope it was written in for arrays.
#[derive(Debug, Clone)]
pub enum Element {
    Value(Value),
    Node(Node, SharedTable),
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Value(left), Element::Value(right)) => left == right,
            (Element::Node(left, left_scope), Element::Node(right, right_scope)) => {
                left == right && Rc::ptr_eq(left_scope, right_scope)
            }
            _ => false,
        }
    }
}

/// Types that answer `!=` for an operand of another type.
fn compares_across_types(value: &Value) -> bool {
    matches!(
        value.kind,
        ValueKind::Number(_) | ValueKind::Boolean(_) | ValueKind::String(_)
    )
}

fn unsupported(op: BinaryOperator, left: &Value, right: &Value) -> OperatorError {
    OperatorError::Unsupported {
        op: op.symbol(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

/// Applies `op` with dispatch on the left operand's type. The result
/// inherits the left operand's frame.
pub fn binary(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, OperatorError> {
    use BinaryOperator::*;

    let kind = match (&left.kind, &right.kind) {
        (ValueKind::Number(a), ValueKind::Number(b)) => match op {
            Add => ValueKind::Number(a + b),
            Sub => ValueKind::Number(a - b),
            Mul => ValueKind::Number(a * b),
            Div => {
                if *b == 0.0 {
                    return Err(OperatorError::DivisionByZero);
                }
                ValueKind::Number(a / b)
            }
            Eq => ValueKind::Boolean(a == b),
            NotEq => ValueKind::Boolean(a != b),
            Less => ValueKind::Boolean(a < b),
            LessEq => ValueKind::Boolean(a <= b),
            Greater => ValueKind::Boolean(a > b),
            GreaterEq => ValueKind::Boolean(a >= b),
            And | Or => return Err(unsupported(op, left, right)),
        },
        (ValueKind::Boolean(a), ValueKind::Boolean(b)) => match op {
            Eq => ValueKind::Boolean(a == b),
            NotEq => ValueKind::Boolean(a != b),
            And => ValueKind::Boolean(*a && *b),
            Or => ValueKind::Boolean(*a || *b),
            _ => return Err(unsupported(op, left, right)),
        },
        (ValueKind::String(a), ValueKind::String(b)) => match op {
            Add => ValueKind::String(format!("{}{}", a, b).into()),
            Eq => ValueKind::Boolean(a == b),
            NotEq => ValueKind::Boolean(a != b),
            _ => return Err(unsupported(op, left, right)),
        },
        _ if op == NotEq && compares_across_types(left) && left.type_name() != right.type_name() => {
            ValueKind::Boolean(true)
        }
        _ => return Err(unsupported(op, left, right)),
    };

    Ok(Value {
        kind,
        span: None,
        context: left.context.clone(),
    })
}

pub fn unary(op: UnaryOperator, operand: &Value) -> Result<Value, OperatorError> {
    let kind = match (op, &operand.kind) {
        (UnaryOperator::Plus, ValueKind::Number(n)) => ValueKind::Number(*n),
        (UnaryOperator::Minus, ValueKind::Number(n)) => ValueKind::Number(-n),
        (UnaryOperator::Not, ValueKind::Boolean(b)) => ValueKind::Boolean(!b),
        _ => {
            return Err(OperatorError::UnsupportedUnary {
                op: op.symbol(),
                operand: operand.type_name(),
            })
        }
    };

    Ok(Value {
        kind,
        span: None,
        context: operand.context.clone(),
    })
}

fn checked_index(index: f64, len: usize) -> Result<usize, OperatorError> {
    if index < 0.0 || index.fract() != 0.0 || index >= len as f64 {
        return Err(OperatorError::IndexOutOfRange);
    }
    Ok(index as usize)
}

/// Zero-based element access on strings and arrays.
pub fn index(target: &Value, index: &Value) -> Result<Element, OperatorError> {
    let position = index
        .as_number()
        .ok_or(OperatorError::InvalidIndexType(index.type_name()))?;

    match &target.kind {
        ValueKind::String(s) => {
            let i = checked_index(position, s.chars().count())?;
            let ch = s.chars().nth(i).ok_or(OperatorError::IndexOutOfRange)?;
            Ok(Element::Value(Value {
                kind: ValueKind::String(ch.to_string().into()),
                span: None,
                context: target.context.clone(),
            }))
        }
        ValueKind::Array(array) => {
            let i = checked_index(position, array.elements.len())?;
            Ok(Element::Node(array.elements[i].clone(), Rc::clone(&array.scope)))
        }
        _ => Err(OperatorError::NotIndexable(target.type_name())),
    }
}
