use std::rc::Rc;

use tracing::{debug, trace};

use super::environment::{Context, SharedTable, SymbolTable};
use super::error::Error;
use super::operators::{self, Element, OperatorError};
use super::parser;
use crate::ast::{Node, NodeKind};
use crate::diagnostic::{SourceFile, Span};
use crate::lexer::Lexer;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Function, Value, ValueKind};

/// `Ok(None)` is an expression that produced nothing, such as an `if`
/// whose condition was false and which has no `else`.
pub type RunTimeResult = Result<Option<Value>, Error>;

/// Frames deeper than this fail instead of exhausting the native stack.
pub const MAX_CALL_DEPTH: usize = 200;

pub struct Interpreter {
    file: Rc<SourceFile>,
}

impl Interpreter {
    pub fn new(file: Rc<SourceFile>) -> Self {
        Self { file }
    }

    fn error(&self, span: Span, details: impl Into<String>, context: &Rc<Context>) -> Error {
        Error::runtime(&self.file, span, details, context)
    }

    fn operator_error(&self, error: OperatorError, span: Span, context: &Rc<Context>) -> Error {
        self.error(span, error.to_string(), context)
    }

    /// Evaluates `node` and stamps its span on the result.
    pub fn visit(&self, node: &Node, context: &Rc<Context>) -> RunTimeResult {
        ensure_sufficient_stack(|| self.visit_node(node, context))
    }

    fn visit_node(&self, node: &Node, context: &Rc<Context>) -> RunTimeResult {
        let value = match &node.kind {
            NodeKind::NumberLiteral(n) => Some(Value::number(*n).with_context(context)),
            NodeKind::BooleanLiteral(b) => Some(Value::boolean(*b).with_context(context)),
            NodeKind::StringLiteral(s) => Some(Value::string(s.as_str()).with_context(context)),
            NodeKind::ArrayLiteral(elements) => Some(
                Value::array(Rc::clone(elements), Rc::clone(&context.symbol_table)).with_context(context),
            ),
            NodeKind::Identifier(name) => Some(self.visit_identifier(name, node.span, context)?),
            NodeKind::VariableDeclaration { declared_type, name, init } => {
                let value = self.value_of(init, context)?;
                let actual = value.type_name().to_lowercase();
                if actual != declared_type.as_str() {
                    return Err(self.error(
                        node.span,
                        format!(
                            "Cannot implicitly convert type '{}' to '{}'",
                            actual,
                            declared_type.as_str()
                        ),
                        context,
                    ));
                }
                context.bind(name.as_str(), value.clone());
                Some(value)
            }
            NodeKind::UnaryOp { op, operand } => {
                let value = self.value_of(operand, context)?;
                let result = operators::unary(*op, &value)
                    .map_err(|e| self.operator_error(e, operand.span, context))?;
                Some(result)
            }
            NodeKind::BinaryOp { op, left, right } => {
                let lhs = self.value_of(left, context)?;
                let rhs = self.value_of(right, context)?;
                let result = operators::binary(*op, &lhs, &rhs).map_err(|e| {
                    let span = match e {
                        OperatorError::DivisionByZero => right.span,
                        _ => left.span,
                    };
                    self.operator_error(e, span, context)
                })?;
                Some(result)
            }
            NodeKind::Conditional { condition, then_branch, else_branch } => {
                let value = self.value_of(condition, context)?;
                let Some(truth) = value.as_bool() else {
                    return Err(self.error(
                        condition.span,
                        format!("Condition cannot be of type {}", value.type_name()),
                        context,
                    ));
                };

                if truth {
                    self.visit(then_branch, context)?
                } else if let Some(else_branch) = else_branch {
                    self.visit(else_branch, context)?
                } else {
                    None
                }
            }
            NodeKind::IndexAccess { target, index } => {
                let container = self.value_of(target, context)?;
                let position = self.value_of(index, context)?;
                let element = operators::index(&container, &position).map_err(|e| {
                    let span = match e {
                        OperatorError::InvalidIndexType(_) => index.span,
                        _ => target.span,
                    };
                    self.operator_error(e, span, context)
                })?;

                match element {
                    Element::Value(value) => Some(value),
                    Element::Node(element, scope) => {
                        let frame = Rc::new(context.with_scope(scope));
                        self.visit(&element, &frame)?
                    }
                }
            }
            NodeKind::FunctionDefinition { name, params, body } => {
                let function = Value::function(Function {
                    name: name.clone(),
                    params: params.clone(),
                    body: Rc::clone(body),
                    closure: Rc::clone(&context.symbol_table),
                })
                .with_context(context);

                if let Some(name) = name {
                    context.bind(name.as_str(), function.clone());
                }
                Some(function)
            }
            NodeKind::Call { callee, args } => self.visit_call(node, callee, args, context)?,
            NodeKind::StatementSequence(statements) => {
                // Each statement's value already carries its own span.
                let mut last = None;
                for statement in statements {
                    trace!(statement = %statement, "evaluating statement");
                    last = self.visit(statement, context)?;
                }
                return Ok(last);
            }
        };

        Ok(value.map(|v| v.with_span(node.span)))
    }

    /// Like [`Interpreter::visit`], but an absent result is an error.
    fn value_of(&self, node: &Node, context: &Rc<Context>) -> Result<Value, Error> {
        self.visit(node, context)?
            .ok_or_else(|| self.error(node.span, "Expression does not produce a value", context))
    }

    fn visit_identifier(&self, name: &str, span: Span, context: &Rc<Context>) -> Result<Value, Error> {
        context
            .lookup(name)
            .ok_or_else(|| self.error(span, format!("{} is not defined", name), context))
    }

    fn visit_call(
        &self,
        node: &Node,
        callee: &Node,
        args: &[Node],
        context: &Rc<Context>,
    ) -> RunTimeResult {
        let target = self.value_of(callee, context)?;

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.value_of(arg, context)?);
        }

        let ValueKind::Function(function) = &target.kind else {
            return Err(self.error(
                callee.span,
                format!("'{}' is not callable", target.type_name()),
                context,
            ));
        };

        if values.len() != function.params.len() {
            return Err(self.error(
                node.span,
                format!(
                    "Function '{}' expects {} argument(s) but got {}",
                    function.display_name(),
                    function.params.len(),
                    values.len()
                ),
                context,
            ));
        }

        if context.depth() >= MAX_CALL_DEPTH {
            return Err(self.error(node.span, "Maximum call depth exceeded", context));
        }

        let table = SymbolTable::child_of(&function.closure);
        for (param, value) in function.params.iter().zip(values) {
            table.borrow_mut().set(param.as_str(), value);
        }

        let frame = Rc::new(Context::child(
            function.display_name(),
            context,
            node.span.start,
            table,
        ));
        trace!(
            function = function.display_name(),
            at = %node.span.start,
            depth = frame.depth(),
            "calling function"
        );

        self.visit(&function.body, &frame)
    }
}

/// Runs programs against one global scope that persists between runs.
pub struct Runtime {
    globals: SharedTable,
}

// Named functions and arrays bound here capture this table.
impl Drop for Runtime {
    fn drop(&mut self) {
        self.globals.borrow_mut().clear();
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            globals: SymbolTable::new_shared(),
        }
    }

    pub fn globals(&self) -> &SharedTable {
        &self.globals
    }

    /// Lexes, parses and evaluates `text`, reporting locations under `name`.
    pub fn run(&self, name: &str, text: &str) -> RunTimeResult {
        debug!(file = name, bytes = text.len(), "running source");

        let file = Rc::new(SourceFile::new(name, text));
        let tokens = Lexer::new(Rc::clone(&file)).make_tokens()?;
        let program = parser::parse(&file, tokens)?;

        let context = Rc::new(Context::root(Rc::clone(&self.globals)));
        Interpreter::new(file).visit(&program, &context)
    }
}

/// Runs `text` in a fresh global scope.
pub fn run(name: &str, text: &str) -> RunTimeResult {
    Runtime::new().run(name, text)
}
