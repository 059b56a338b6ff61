use std::fmt;
use std::rc::{Rc, Weak};

use crate::ast::Node;
use crate::diagnostic::Span;
use crate::interpreter::environment::{Context, SharedTable};

/// A runtime value together with where it came from.
///
/// `span` and `context` only feed diagnostics; equality ignores them.
#[derive(Debug, Clone)]
pub struct Value {
    pub kind: ValueKind,
    pub span: Option<Span>,
    pub context: Option<Weak<Context>>,
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    Number(f64),
    Boolean(bool),
    String(Rc<str>),
    Array(Rc<Array>),
    Function(Rc<Function>),
}

/// Element expressions, evaluated in `scope` when indexed.
pub struct Array {
    pub elements: Rc<[Node]>,
    pub scope: SharedTable,
}

// The scope can hold this array, so it is left out.
impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

pub struct Function {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<Node>,
    pub closure: SharedTable,
}

impl Function {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

// The closure table can hold this function, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(left), ValueKind::Number(right)) => left == right,
            (ValueKind::Boolean(left), ValueKind::Boolean(right)) => left == right,
            (ValueKind::String(left), ValueKind::String(right)) => left == right,
            (ValueKind::Array(left), ValueKind::Array(right)) => {
                left.elements == right.elements && Rc::ptr_eq(&left.scope, &right.scope)
            }
            (ValueKind::Function(left), ValueKind::Function(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            span: None,
            context: None,
        }
    }

    pub fn number(n: f64) -> Self {
        Self::new(ValueKind::Number(n))
    }

    pub fn boolean(b: bool) -> Self {
        Self::new(ValueKind::Boolean(b))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Self::new(ValueKind::String(s.into()))
    }

    pub fn array(elements: Rc<[Node]>, scope: SharedTable) -> Self {
        Self::new(ValueKind::Array(Rc::new(Array { elements, scope })))
    }

    pub fn function(function: Function) -> Self {
        Self::new(ValueKind::Function(Rc::new(function)))
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, context: &Rc<Context>) -> Self {
        self.context = Some(Rc::downgrade(context));
        self
    }

    /// Capitalised type name used in messages. Declarations compare against
    /// its lower-cased form.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Number(_) => "Number",
            ValueKind::Boolean(_) => "Boolean",
            ValueKind::String(_) => "String",
            ValueKind::Array(_) => "Array",
            ValueKind::Function(_) => "Function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let ValueKind::Number(n) = self.kind {
            Some(n)
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let ValueKind::Boolean(b) = self.kind {
            Some(b)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let ValueKind::String(s) = &self.kind {
            Some(s)
        } else {
            None
        }
    }
}

/// Integral numbers print without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.fract() != 0.0 {
        n.to_string()
    } else {
        format!("{:.0}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Number(n) => write!(f, "{}", format_number(*n)),
            ValueKind::Boolean(b) => write!(f, "{}", b),
            ValueKind::String(s) => write!(f, "{}", s),
            ValueKind::Array(array) => {
                let items: Vec<String> = array.elements.iter().map(|node| node.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            ValueKind::Function(function) => write!(f, "<function {}>", function.display_name()),
        }
    }
}
