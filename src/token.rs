use std::fmt;

use crate::diagnostic::{Position, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    If,
    Else,
    Function,
    And,
    Or,
    Not,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "if" => Some(Keyword::If),
            "else" => Some(Keyword::Else),
            "function" => Some(Keyword::Function),
            "and" => Some(Keyword::And),
            "or" => Some(Keyword::Or),
            "not" => Some(Keyword::Not),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Function => "function",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
        }
    }
}

/// Reserved type names usable in variable declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Number,
    String,
    Boolean,
    Array,
}

impl TypeName {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "number" => Some(TypeName::Number),
            "string" => Some(TypeName::String),
            "boolean" => Some(TypeName::Boolean),
            "array" => Some(TypeName::Array),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::Number => "number",
            TypeName::String => "string",
            TypeName::Boolean => "boolean",
            TypeName::Array => "array",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals and names
    Number(f64),
    String(String),
    Boolean(bool),
    Identifier(String),
    Keyword(Keyword),
    Type(TypeName),

    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,

    // Comparison
    EqualEqual,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Logical
    Not,
    And,
    Or,

    // Delimiters
    Equals,
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    EndOfFile,
}

impl TokenKind {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "Number:{}", n),
            TokenKind::String(s) => write!(f, "String:{}", s),
            TokenKind::Boolean(b) => write!(f, "Boolean:{}", b),
            TokenKind::Identifier(name) => write!(f, "Identifier:{}", name),
            TokenKind::Keyword(k) => write!(f, "Keyword:{}", k.as_str()),
            TokenKind::Type(t) => write!(f, "Type:{}", t.as_str()),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Multiply => write!(f, "'*'"),
            TokenKind::Divide => write!(f, "'/'"),
            TokenKind::EqualEqual => write!(f, "'=='"),
            TokenKind::NotEqual => write!(f, "'!='"),
            TokenKind::Less => write!(f, "'<'"),
            TokenKind::LessEqual => write!(f, "'<='"),
            TokenKind::Greater => write!(f, "'>'"),
            TokenKind::GreaterEqual => write!(f, "'>='"),
            TokenKind::Not => write!(f, "'!'"),
            TokenKind::And => write!(f, "'&&'"),
            TokenKind::Or => write!(f, "'||'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::EndOfFile => write!(f, "end of file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// A token occupying the single character at `start`.
    pub fn new(kind: TokenKind, start: Position) -> Self {
        Self {
            kind,
            span: Span::single(start),
        }
    }

    pub fn spanning(kind: TokenKind, start: Position, end: Position) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}
