use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use super::environment::Context;
use crate::diagnostic::{DiagnosticRenderer, Frame, SourceFile, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    IllegalChar,
    ExpectedChar,
    InvalidSyntax,
    RunTime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::IllegalChar => write!(f, "IllegalCharError"),
            ErrorKind::ExpectedChar => write!(f, "ExpectedCharError"),
            ErrorKind::InvalidSyntax => write!(f, "InvalidSyntaxError"),
            ErrorKind::RunTime => write!(f, "RunTimeError"),
        }
    }
}

/// Any failure produced while lexing, parsing or evaluating a source file.
///
/// `Display` gives the one-line headline; [`Error::render`] gives the full
/// report with source excerpt and, for runtime errors, the traceback.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {details}")]
pub struct Error {
    pub kind: ErrorKind,
    pub details: String,
    pub span: Span,
    pub file: Rc<SourceFile>,
    pub context: Option<Rc<Context>>,
}

impl Error {
    fn located(kind: ErrorKind, file: &Rc<SourceFile>, span: Span, details: impl Into<String>) -> Self {
        Self {
            kind,
            details: details.into(),
            span,
            file: Rc::clone(file),
            context: None,
        }
    }

    pub fn illegal_char(file: &Rc<SourceFile>, span: Span, details: impl Into<String>) -> Self {
        Self::located(ErrorKind::IllegalChar, file, span, details)
    }

    pub fn expected_char(file: &Rc<SourceFile>, span: Span, details: impl Into<String>) -> Self {
        Self::located(ErrorKind::ExpectedChar, file, span, details)
    }

    pub fn invalid_syntax(file: &Rc<SourceFile>, span: Span, details: impl Into<String>) -> Self {
        Self::located(ErrorKind::InvalidSyntax, file, span, details)
    }

    pub fn runtime(
        file: &Rc<SourceFile>,
        span: Span,
        details: impl Into<String>,
        context: &Rc<Context>,
    ) -> Self {
        Self {
            kind: ErrorKind::RunTime,
            details: details.into(),
            span,
            file: Rc::clone(file),
            context: Some(Rc::clone(context)),
        }
    }

    /// Walks the context chain from the failing frame outwards and returns
    /// the frames outermost first.
    pub fn traceback(&self) -> Vec<Frame> {
        let mut frames = Vec::new();
        let mut line = self.span.start.line;
        let mut current = self.context.clone();

        while let Some(context) = current {
            frames.push(Frame {
                line: line + 1,
                display_name: context.display_name.clone(),
            });
            if let Some(entry) = context.parent_entry_position {
                line = entry.line;
            }
            current = context.parent.clone();
        }

        frames.reverse();
        frames
    }

    pub fn render(&self, use_color: bool) -> String {
        let renderer = DiagnosticRenderer::new(&self.file, use_color);
        let headline = self.to_string();
        match self.kind {
            ErrorKind::RunTime => renderer.render_traceback(&self.traceback(), &headline, self.span),
            _ => renderer.render_located(&headline, self.span),
        }
    }
}
