use std::rc::Rc;

use tracing::{debug, trace};

use crate::diagnostic::{Position, SourceFile, Span};
use crate::interpreter::Error;
use crate::token::{Keyword, Token, TokenKind, TypeName};

/// Character scanner with a single step of pushback.
///
/// Every `make_*` routine leaves the cursor on the last character it
/// consumed; the main loop then steps past it. Routines that only notice the
/// end of their lexeme by reading one character too far call
/// [`Lexer::reverse`] to give that character back.
pub struct Lexer {
    file: Rc<SourceFile>,
    chars: Vec<char>,
    pos: Position,
    last_pos: Position,
    current: Option<char>,
}

impl Lexer {
    pub fn new(file: Rc<SourceFile>) -> Self {
        let chars: Vec<char> = file.text.chars().collect();
        let current = chars.first().copied();
        Self {
            file,
            chars,
            pos: Position::default(),
            last_pos: Position::default(),
            current,
        }
    }

    fn advance(&mut self) {
        self.last_pos = self.pos;
        self.pos.advance(self.current);
        self.current = self.chars.get(self.pos.offset).copied();
    }

    fn reverse(&mut self) {
        self.pos = self.last_pos;
        self.current = self.chars.get(self.pos.offset).copied();
    }

    fn single(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.pos)
    }

    pub fn make_tokens(&mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.current {
            let token = match ch {
                ' ' | '\t' | '\n' | '\r' => {
                    self.advance();
                    continue;
                }
                c if c.is_ascii_digit() => self.make_number()?,
                c if c.is_ascii_alphabetic() || c == '_' => self.make_identifier(),
                '"' => self.make_string(),
                '=' | '>' | '<' | '!' | '|' | '&' => self.make_operator(ch)?,
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                '[' => self.single(TokenKind::LBracket),
                ']' => self.single(TokenKind::RBracket),
                '+' => self.single(TokenKind::Plus),
                '-' => self.single(TokenKind::Minus),
                '*' => self.single(TokenKind::Multiply),
                '/' => self.single(TokenKind::Divide),
                ';' => self.single(TokenKind::Semicolon),
                ',' => self.single(TokenKind::Comma),
                other => {
                    return Err(Error::illegal_char(
                        &self.file,
                        Span::single(self.pos),
                        format!("Unexpected character '{}'", other),
                    ));
                }
            };

            trace!(token = %token.kind, at = %token.span.start, "token");
            tokens.push(token);
            self.advance();
        }

        tokens.push(Token::new(TokenKind::EndOfFile, self.pos));
        debug!(file = %self.file.name, count = tokens.len(), "lexed source");
        Ok(tokens)
    }

    fn make_number(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        let mut literal = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.current {
            if ch == '.' {
                if seen_dot {
                    break;
                }
                seen_dot = true;
            } else if !ch.is_ascii_digit() {
                break;
            }
            literal.push(ch);
            self.advance();
        }

        let end = self.pos;
        self.reverse();

        let value = literal.parse::<f64>().map_err(|_| {
            Error::illegal_char(&self.file, Span::new(start, end), format!("Invalid number '{}'", literal))
        })?;
        Ok(Token::spanning(TokenKind::Number(value), start, end))
    }

    fn make_identifier(&mut self) -> Token {
        let start = self.pos;
        let mut word = String::new();

        while let Some(ch) = self.current {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                break;
            }
            word.push(ch);
            self.advance();
        }

        let end = self.pos;
        self.reverse();

        let kind = if let Some(type_name) = TypeName::from_word(&word) {
            TokenKind::Type(type_name)
        } else if word == "true" {
            TokenKind::Boolean(true)
        } else if word == "false" {
            TokenKind::Boolean(false)
        } else if let Some(keyword) = Keyword::from_word(&word) {
            TokenKind::Keyword(keyword)
        } else {
            TokenKind::Identifier(word)
        };

        Token::spanning(kind, start, end)
    }

    /// Reads a double-quoted string. An unterminated string runs to the end
    /// of input without raising an error.
    fn make_string(&mut self) -> Token {
        let start = self.pos;
        let mut value = String::new();
        let mut escape = false;

        self.advance();

        while let Some(ch) = self.current {
            if escape {
                value.push(match ch {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                break;
            } else {
                value.push(ch);
            }
            self.advance();
        }

        if self.current.is_some() {
            let end = self.pos.advanced(self.current);
            Token::spanning(TokenKind::String(value), start, end)
        } else {
            let end = self.pos;
            self.reverse();
            Token::spanning(TokenKind::String(value), start, end)
        }
    }

    fn make_operator(&mut self, first: char) -> Result<Token, Error> {
        let start = self.pos;
        self.advance();

        let paired = match (first, self.current) {
            ('=', Some('=')) => Some(TokenKind::EqualEqual),
            ('>', Some('=')) => Some(TokenKind::GreaterEqual),
            ('<', Some('=')) => Some(TokenKind::LessEqual),
            ('!', Some('=')) => Some(TokenKind::NotEqual),
            ('|', Some('|')) => Some(TokenKind::Or),
            ('&', Some('&')) => Some(TokenKind::And),
            _ => None,
        };

        if let Some(kind) = paired {
            let end = self.pos.advanced(self.current);
            return Ok(Token::spanning(kind, start, end));
        }

        self.reverse();

        let kind = match first {
            '=' => TokenKind::Equals,
            '>' => TokenKind::Greater,
            '<' => TokenKind::Less,
            '!' => TokenKind::Not,
            other => {
                return Err(Error::expected_char(
                    &self.file,
                    Span::single(start),
                    format!("Expected '{}' after '{}'", other, other),
                ));
            }
        };

        Ok(Token::new(kind, start))
    }
}

/// Tokenizes `text` reported under `name`.
pub fn tokenize(name: &str, text: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(Rc::new(SourceFile::new(name, text))).make_tokens()
}
