use std::rc::Rc;

use tracing::debug;

use super::error::Error;
use crate::ast::{BinaryOperator, Node, NodeKind, UnaryOperator};
use crate::diagnostic::{SourceFile, Span};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Keyword, Token, TokenKind};

/// Deepest nesting of expressions, unary chains and operator chains the
/// parser accepts.
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Outcome of one grammar rule plus the number of tokens it consumed.
///
/// An error recorded after zero advancements may still be replaced by a
/// later alternative's error; once a token has been consumed, the first
/// error sticks.
#[derive(Debug, Default)]
pub struct ParseResult {
    pub node: Option<Node>,
    pub error: Option<Error>,
    pub advance_count: usize,
}

impl ParseResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_advancement(&mut self) {
        self.advance_count += 1;
    }

    /// Absorbs a sub-result, returning its node when it succeeded.
    pub fn register(&mut self, res: ParseResult) -> Option<Node> {
        self.advance_count += res.advance_count;
        if res.error.is_some() {
            self.error = res.error;
            return None;
        }
        res.node
    }

    pub fn success(mut self, node: Node) -> Self {
        self.node = Some(node);
        self
    }

    pub fn failure(mut self, error: Error) -> Self {
        if self.error.is_none() || self.advance_count == 0 {
            self.error = Some(error);
        }
        self
    }

    pub fn into_result(self) -> Result<Node, Error> {
        match (self.error, self.node) {
            (Some(error), _) => Err(error),
            (None, Some(node)) => Ok(node),
            (None, None) => Ok(Node::new(NodeKind::StatementSequence(Vec::new()), Span::default())),
        }
    }
}

type Rule = fn(&mut Parser) -> ParseResult;
type OperatorSet = fn(&TokenKind) -> Option<BinaryOperator>;

fn logical_ops(kind: &TokenKind) -> Option<BinaryOperator> {
    BinaryOperator::from_token(kind).filter(|op| matches!(op, BinaryOperator::And | BinaryOperator::Or))
}

fn comparison_ops(kind: &TokenKind) -> Option<BinaryOperator> {
    use BinaryOperator::*;
    BinaryOperator::from_token(kind).filter(|op| matches!(op, Eq | NotEq | Less | LessEq | Greater | GreaterEq))
}

fn additive_ops(kind: &TokenKind) -> Option<BinaryOperator> {
    BinaryOperator::from_token(kind).filter(|op| matches!(op, BinaryOperator::Add | BinaryOperator::Sub))
}

fn multiplicative_ops(kind: &TokenKind) -> Option<BinaryOperator> {
    BinaryOperator::from_token(kind).filter(|op| matches!(op, BinaryOperator::Mul | BinaryOperator::Div))
}

pub struct Parser {
    file: Rc<SourceFile>,
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    pub fn new(file: Rc<SourceFile>, mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::EndOfFile)) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or_default();
            tokens.push(Token::new(TokenKind::EndOfFile, end));
        }
        Self {
            file,
            tokens,
            index: 0,
            depth: 0,
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current().kind.is_keyword(keyword)
    }

    fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    fn syntax_error(&self, details: &str) -> Error {
        Error::invalid_syntax(&self.file, self.current().span, details)
    }

    /// Runs `rule` one nesting level deeper.
    fn nested(&mut self, rule: Rule) -> ParseResult {
        if self.depth >= MAX_NESTING_DEPTH {
            return ParseResult::new().failure(self.syntax_error("Maximum nesting depth exceeded"));
        }

        self.depth += 1;
        let res = ensure_sufficient_stack(|| rule(self));
        self.depth -= 1;
        res
    }

    /// `program := statement ';' (statement ';')*`
    pub fn parse(&mut self) -> ParseResult {
        let mut res = ParseResult::new();
        let mut statements = Vec::new();
        let start = self.current().span;
        let mut end = start;

        loop {
            let Some(statement) = res.register(self.statement()) else {
                return res;
            };
            statements.push(statement);

            if !self.at(&TokenKind::Semicolon) {
                return res.failure(self.syntax_error("Expected ';'"));
            }
            end = self.current().span;
            res.register_advancement();
            self.advance();

            if self.at(&TokenKind::EndOfFile) {
                break;
            }
        }

        debug!(statements = statements.len(), "parsed program");
        res.success(Node::new(NodeKind::StatementSequence(statements), start.merge(end)))
    }

    fn statement(&mut self) -> ParseResult {
        self.expr()
    }

    fn expr(&mut self) -> ParseResult {
        self.nested(Parser::declaration_or_logic)
    }

    fn declaration_or_logic(&mut self) -> ParseResult {
        let mut res = ParseResult::new();

        if self.at(&TokenKind::LBrace) {
            let start = self.current().span;
            res.register_advancement();
            self.advance();

            let Some(inner) = res.register(self.expr()) else {
                return res;
            };

            if !self.at(&TokenKind::RBrace) {
                return res.failure(self.syntax_error("Expected '}'"));
            }
            let span = start.merge(self.current().span);
            res.register_advancement();
            self.advance();

            return res.success(Node::new(inner.kind, span));
        }

        if let TokenKind::Type(declared_type) = self.current().kind {
            let start = self.current().span;
            res.register_advancement();
            self.advance();

            let TokenKind::Identifier(name) = self.current().kind.clone() else {
                return res.failure(self.syntax_error("Expected identifier"));
            };
            res.register_advancement();
            self.advance();

            if !self.at(&TokenKind::Equals) {
                return res.failure(self.syntax_error("Expected '='"));
            }
            res.register_advancement();
            self.advance();

            let Some(init) = res.register(self.expr()) else {
                return res;
            };
            let span = start.merge(init.span);
            return res.success(Node::new(
                NodeKind::VariableDeclaration {
                    declared_type,
                    name,
                    init: Box::new(init),
                },
                span,
            ));
        }

        let Some(node) = res.register(self.bin_op(Parser::comp_expr, logical_ops)) else {
            return res;
        };
        res.success(node)
    }

    fn comp_expr(&mut self) -> ParseResult {
        let mut res = ParseResult::new();

        if self.at(&TokenKind::Not) || self.at_keyword(Keyword::Not) {
            let start = self.current().span;
            res.register_advancement();
            self.advance();

            let Some(operand) = res.register(self.nested(Parser::comp_expr)) else {
                return res;
            };
            let span = start.merge(operand.span);
            return res.success(Node::new(
                NodeKind::UnaryOp {
                    op: UnaryOperator::Not,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        let Some(node) = res.register(self.bin_op(Parser::arith_expr, comparison_ops)) else {
            return res.failure(self.syntax_error(
                "Expected number, string, boolean, identifier, 'if', 'function', '[', '(', '+', '-' or '!'",
            ));
        };
        res.success(node)
    }

    fn arith_expr(&mut self) -> ParseResult {
        self.bin_op(Parser::term, additive_ops)
    }

    fn term(&mut self) -> ParseResult {
        self.bin_op(Parser::factor, multiplicative_ops)
    }

    fn factor(&mut self) -> ParseResult {
        let mut res = ParseResult::new();

        let op = match self.current().kind {
            TokenKind::Plus => Some(UnaryOperator::Plus),
            TokenKind::Minus => Some(UnaryOperator::Minus),
            _ => None,
        };

        if let Some(op) = op {
            let start = self.current().span;
            res.register_advancement();
            self.advance();

            let Some(operand) = res.register(self.nested(Parser::factor)) else {
                return res;
            };
            let span = start.merge(operand.span);
            return res.success(Node::new(
                NodeKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        self.index_expr()
    }

    /// `call ('[' expr ']')?`
    fn index_expr(&mut self) -> ParseResult {
        let mut res = ParseResult::new();

        let Some(target) = res.register(self.call()) else {
            return res;
        };

        if !self.at(&TokenKind::LBracket) {
            return res.success(target);
        }
        res.register_advancement();
        self.advance();

        let Some(index) = res.register(self.expr()) else {
            return res;
        };

        if !self.at(&TokenKind::RBracket) {
            return res.failure(self.syntax_error("Expected ']'"));
        }
        let span = target.span.merge(self.current().span);
        res.register_advancement();
        self.advance();

        res.success(Node::new(
            NodeKind::IndexAccess {
                target: Box::new(target),
                index: Box::new(index),
            },
            span,
        ))
    }

    /// `atom ('(' (expr (',' expr)*)? ')')?`
    fn call(&mut self) -> ParseResult {
        let mut res = ParseResult::new();

        let Some(callee) = res.register(self.atom()) else {
            return res;
        };

        if !self.at(&TokenKind::LParen) {
            return res.success(callee);
        }
        res.register_advancement();
        self.advance();

        let mut args = Vec::new();
        if !self.at(&TokenKind::RParen) {
            loop {
                let Some(arg) = res.register(self.expr()) else {
                    return res;
                };
                args.push(arg);

                if self.at(&TokenKind::Comma) {
                    res.register_advancement();
                    self.advance();
                } else if self.at(&TokenKind::RParen) {
                    break;
                } else {
                    return res.failure(self.syntax_error("Expected ',' or ')'"));
                }
            }
        }

        let span = callee.span.merge(self.current().span);
        res.register_advancement();
        self.advance();

        res.success(Node::new(
            NodeKind::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }

    fn atom(&mut self) -> ParseResult {
        let mut res = ParseResult::new();
        let token = self.current().clone();

        let literal = match token.kind {
            TokenKind::Number(n) => Some(NodeKind::NumberLiteral(n)),
            TokenKind::String(s) => Some(NodeKind::StringLiteral(s)),
            TokenKind::Boolean(b) => Some(NodeKind::BooleanLiteral(b)),
            TokenKind::Identifier(name) => Some(NodeKind::Identifier(name)),
            _ => None,
        };

        if let Some(kind) = literal {
            res.register_advancement();
            self.advance();
            return res.success(Node::new(kind, token.span));
        }

        if self.at(&TokenKind::LParen) {
            res.register_advancement();
            self.advance();

            let Some(inner) = res.register(self.expr()) else {
                return res;
            };

            if !self.at(&TokenKind::RParen) {
                return res.failure(self.syntax_error("Expected ')'"));
            }
            res.register_advancement();
            self.advance();
            return res.success(inner);
        }

        if self.at(&TokenKind::LBracket) {
            let Some(array) = res.register(self.array_literal()) else {
                return res;
            };
            return res.success(array);
        }

        if self.at_keyword(Keyword::If) {
            let Some(conditional) = res.register(self.if_expr()) else {
                return res;
            };
            return res.success(conditional);
        }

        if self.at_keyword(Keyword::Function) {
            let Some(function) = res.register(self.function_definition()) else {
                return res;
            };
            return res.success(function);
        }

        res.failure(self.syntax_error(
            "Expected number, string, boolean, identifier, '[', '(', 'if' or 'function'",
        ))
    }

    fn array_literal(&mut self) -> ParseResult {
        let mut res = ParseResult::new();
        let start = self.current().span;
        res.register_advancement();
        self.advance();

        let mut elements = Vec::new();
        if !self.at(&TokenKind::RBracket) {
            loop {
                let Some(element) = res.register(self.expr()) else {
                    return res;
                };
                elements.push(element);

                if self.at(&TokenKind::Comma) {
                    res.register_advancement();
                    self.advance();
                } else if self.at(&TokenKind::RBracket) {
                    break;
                } else {
                    return res.failure(self.syntax_error("Expected ',' or ']'"));
                }
            }
        }

        let span = start.merge(self.current().span);
        res.register_advancement();
        self.advance();

        res.success(Node::new(NodeKind::ArrayLiteral(elements.into()), span))
    }

    /// `'if' '(' expr ')' expr ('else' expr)?`
    fn if_expr(&mut self) -> ParseResult {
        let mut res = ParseResult::new();
        let start = self.current().span;
        res.register_advancement();
        self.advance();

        if !self.at(&TokenKind::LParen) {
            return res.failure(self.syntax_error("Expected '('"));
        }
        res.register_advancement();
        self.advance();

        let Some(condition) = res.register(self.expr()) else {
            return res;
        };

        if !self.at(&TokenKind::RParen) {
            return res.failure(self.syntax_error("Expected ')'"));
        }
        res.register_advancement();
        self.advance();

        let Some(then_branch) = res.register(self.expr()) else {
            return res;
        };

        let mut else_branch = None;
        if self.at_keyword(Keyword::Else) {
            res.register_advancement();
            self.advance();

            let Some(branch) = res.register(self.expr()) else {
                return res;
            };
            else_branch = Some(Box::new(branch));
        }

        let end = else_branch.as_ref().map_or(then_branch.span, |branch| branch.span);
        res.success(Node::new(
            NodeKind::Conditional {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            start.merge(end),
        ))
    }

    /// `'function' Identifier? '(' (Identifier (',' Identifier)*)? ')' expr`
    fn function_definition(&mut self) -> ParseResult {
        let mut res = ParseResult::new();
        let start = self.current().span;
        res.register_advancement();
        self.advance();

        let mut name = None;
        if let TokenKind::Identifier(ident) = &self.current().kind {
            name = Some(ident.clone());
            res.register_advancement();
            self.advance();
        }

        if !self.at(&TokenKind::LParen) {
            return res.failure(self.syntax_error("Expected '('"));
        }
        res.register_advancement();
        self.advance();

        let mut params = Vec::new();
        if !self.at(&TokenKind::RParen) {
            loop {
                let TokenKind::Identifier(param) = self.current().kind.clone() else {
                    return res.failure(self.syntax_error("Expected identifier"));
                };
                params.push(param);
                res.register_advancement();
                self.advance();

                if self.at(&TokenKind::Comma) {
                    res.register_advancement();
                    self.advance();
                } else if self.at(&TokenKind::RParen) {
                    break;
                } else {
                    return res.failure(self.syntax_error("Expected ',' or ')'"));
                }
            }
        }
        res.register_advancement();
        self.advance();

        let Some(body) = res.register(self.expr()) else {
            return res;
        };
        let span = start.merge(body.span);

        res.success(Node::new(
            NodeKind::FunctionDefinition {
                name,
                params,
                body: Rc::new(body),
            },
            span,
        ))
    }

    /// Left-associative chain of `operand` joined by operators from `ops`.
    fn bin_op(&mut self, operand: Rule, ops: OperatorSet) -> ParseResult {
        let mut res = ParseResult::new();

        let Some(mut left) = res.register(operand(self)) else {
            return res;
        };

        let mut levels = 0;
        while let Some(op) = ops(&self.current().kind) {
            levels += 1;
            if self.depth + levels > MAX_NESTING_DEPTH {
                return res.failure(self.syntax_error("Maximum nesting depth exceeded"));
            }
            res.register_advancement();
            self.advance();

            let Some(right) = res.register(operand(self)) else {
                return res;
            };
            let span = left.span.merge(right.span);
            left = Node::new(
                NodeKind::BinaryOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        res.success(left)
    }
}

/// Parses a token stream produced for `file`.
pub fn parse(file: &Rc<SourceFile>, tokens: Vec<Token>) -> Result<Node, Error> {
    Parser::new(Rc::clone(file), tokens).parse().into_result()
}
