pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
mod stack;
pub mod token;
pub mod value;

pub use ast::{Node, NodeKind};
pub use diagnostic::{Position, SourceFile, Span};
pub use interpreter::{run, Error, ErrorKind, Runtime};
pub use token::{Token, TokenKind};
pub use value::{Value, ValueKind};
