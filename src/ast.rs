use std::fmt;
use std::rc::Rc;

use crate::diagnostic::Span;
use crate::token::{TokenKind, TypeName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEq => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEq => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }

    /// The symbolic operator a token stands for. Word operators map to the
    /// same variants as their symbolic forms.
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        use crate::token::Keyword;

        let op = match kind {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Sub,
            TokenKind::Multiply => BinaryOperator::Mul,
            TokenKind::Divide => BinaryOperator::Div,
            TokenKind::EqualEqual => BinaryOperator::Eq,
            TokenKind::NotEqual => BinaryOperator::NotEq,
            TokenKind::Less => BinaryOperator::Less,
            TokenKind::LessEqual => BinaryOperator::LessEq,
            TokenKind::Greater => BinaryOperator::Greater,
            TokenKind::GreaterEqual => BinaryOperator::GreaterEq,
            TokenKind::And | TokenKind::Keyword(Keyword::And) => BinaryOperator::And,
            TokenKind::Or | TokenKind::Keyword(Keyword::Or) => BinaryOperator::Or,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    NumberLiteral(f64),
    BooleanLiteral(bool),
    StringLiteral(String),
    /// Elements stay unevaluated until indexed.
    ArrayLiteral(Rc<[Node]>),
    Identifier(String),
    VariableDeclaration {
        declared_type: TypeName,
        name: String,
        init: Box<Node>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Node>,
    },
    BinaryOp {
        op: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Conditional {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    IndexAccess {
        target: Box<Node>,
        index: Box<Node>,
    },
    FunctionDefinition {
        name: Option<String>,
        params: Vec<String>,
        body: Rc<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    StatementSequence(Vec<Node>),
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Node]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Prints nodes back as source. Binary and unary operations are fully
/// parenthesised so the tree shape is visible.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::NumberLiteral(n) => write!(f, "{}", crate::value::format_number(*n)),
            NodeKind::BooleanLiteral(b) => write!(f, "{}", b),
            NodeKind::StringLiteral(s) => write!(f, "{:?}", s),
            NodeKind::ArrayLiteral(elements) => {
                write!(f, "[")?;
                write_list(f, elements)?;
                write!(f, "]")
            }
            NodeKind::Identifier(name) => write!(f, "{}", name),
            NodeKind::VariableDeclaration { declared_type, name, init } => {
                write!(f, "{} {} = {}", declared_type.as_str(), name, init)
            }
            NodeKind::UnaryOp { op, operand } => write!(f, "({}{})", op.symbol(), operand),
            NodeKind::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            NodeKind::Conditional { condition, then_branch, else_branch } => {
                write!(f, "if ({}) {}", condition, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {}", else_branch)?;
                }
                Ok(())
            }
            NodeKind::IndexAccess { target, index } => write!(f, "{}[{}]", target, index),
            NodeKind::FunctionDefinition { name, params, body } => {
                write!(f, "function ")?;
                if let Some(name) = name {
                    write!(f, "{}", name)?;
                }
                write!(f, "({}) {}", params.join(", "), body)
            }
            NodeKind::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            NodeKind::StatementSequence(statements) => {
                for statement in statements {
                    write!(f, "{};", statement)?;
                }
                Ok(())
            }
        }
    }
}
