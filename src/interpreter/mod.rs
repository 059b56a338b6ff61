pub mod environment;
pub mod error;
pub mod evaluator;
pub mod operators;
pub mod parser;

pub use environment::{Context, SharedTable, SymbolTable, PROGRAM_CONTEXT};
pub use error::{Error, ErrorKind};
pub use evaluator::{run, Interpreter, RunTimeResult, Runtime, MAX_CALL_DEPTH};
pub use operators::{Element, OperatorError};
pub use parser::{ParseResult, Parser, MAX_NESTING_DEPTH};
