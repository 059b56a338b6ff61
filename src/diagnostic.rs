use std::fmt;

/// A cursor into source text. Lines and columns are 0-based; `offset` counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self { offset, line, column }
    }

    /// Moves past `current`, the character the cursor is leaving.
    pub fn advance(&mut self, current: Option<char>) -> &mut Self {
        self.offset += 1;
        self.column += 1;

        if current == Some('\n') {
            self.line += 1;
            self.column = 0;
        }

        self
    }

    /// Returns a copy one character further along, leaving `self` untouched.
    pub fn advanced(self, current: Option<char>) -> Self {
        let mut next = self;
        next.advance(current);
        next
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A half-open `[start, end)` range of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A span covering the single character at `start`.
    pub fn single(start: Position) -> Self {
        Self {
            start,
            end: start.advanced(None),
        }
    }

    pub fn merge(self, other: Span) -> Span {
        let start = if other.start.offset < self.start.offset { other.start } else { self.start };
        let end = if other.end.offset > self.end.offset { other.end } else { self.end };
        Span { start, end }
    }
}

/// The text being run together with the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// The content of a 0-based line without its terminator, or `""` past the end.
    pub fn line(&self, index: usize) -> &str {
        self.text
            .split('\n')
            .nth(index)
            .map(|line| line.trim_end_matches('\r'))
            .unwrap_or("")
    }
}

/// One entry of a rendered traceback, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub line: usize,
    pub display_name: String,
}

/// Renders error headlines, source excerpts and tracebacks.
pub struct DiagnosticRenderer<'a> {
    source: &'a SourceFile,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a SourceFile, use_color: bool) -> Self {
        Self { source, use_color }
    }

    /// Lexer and parser errors: headline, location, then the excerpt.
    pub fn render_located(&self, headline: &str, span: Span) -> String {
        let mut output = String::new();
        output.push_str(headline);
        output.push('\n');
        output.push_str(&format!("File {}, line: {}\n", self.source.name, span.start.line + 1));
        output.push('\n');
        output.push_str(&self.render_excerpt(span));
        output
    }

    /// Runtime errors: traceback, headline, then the excerpt.
    pub fn render_traceback(&self, frames: &[Frame], headline: &str, span: Span) -> String {
        let mut output = String::from("Traceback (most recent call last):\n");
        for frame in frames {
            output.push_str(&format!("   line: {}, in {}\n", frame.line, frame.display_name));
        }
        output.push_str(headline);
        output.push_str("\n\n");
        output.push_str(&self.render_excerpt(span));
        output
    }

    /// The offending line followed by a caret line spanning it.
    pub fn render_excerpt(&self, span: Span) -> String {
        let line = self.source.line(span.start.line);
        let carets = "^".repeat(line.chars().count());
        format!("{}\n{}\n", line, self.style_red(&carets))
    }

    fn style_red(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }
}
