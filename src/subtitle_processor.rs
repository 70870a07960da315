use std::fmt;

// @module: Subtitle document model

/// Byte order mark some encoders put in front of the header
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Dominant line ending of a document
///
/// Lines are always split on `'\n'` and each line remembers its own `'\r'`,
/// so mixed endings survive a round trip. This only reports what the
/// document uses: `CrLf` when every line break is `"\r\n"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    // @separator: Unix newline
    #[default]
    Lf,
    // @separator: Windows newline
    CrLf,
}

impl Separator {
    /// Detect the line ending used by a raw document
    pub fn detect(text: &str) -> Self {
        let breaks = text.matches('\n').count();
        if breaks > 0 && text.matches("\r\n").count() == breaks {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    // @returns: Separator string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lf => write!(f, "LF"),
            Self::CrLf => write!(f, "CRLF"),
        }
    }
}

// @struct: Single line of a document, identified by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    // @field: Zero-based offset in the document
    pub position: usize,

    // @field: Line text without its line ending
    pub text: String,

    // @field: Whether the line ended with "\r" before the newline
    pub carriage_return: bool,
}

impl Line {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            carriage_return: false,
        }
    }

    /// Split a raw piece of text into a line and its trailing carriage return
    fn from_raw(position: usize, raw: &str) -> Self {
        match raw.strip_suffix('\r') {
            Some(text) => Self {
                position,
                text: text.to_string(),
                carriage_return: true,
            },
            None => Self::new(position, raw),
        }
    }
}

/// A complete, already-fetched caption document split into lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleDocument {
    /// Lines in document order
    lines: Vec<Line>,

    /// Dominant line ending of the raw text
    separator: Separator,

    /// The raw text started with a byte order mark
    byte_order_mark: bool,

    /// Where the document came from (URL or path), if known
    source: Option<String>,
}

impl SubtitleDocument {
    /// Split raw text into lines
    ///
    /// A leading byte order mark is set aside so the header line classifies
    /// as a header. Empty input yields a single empty line, so every document
    /// has at least one line and `render` always reproduces the input exactly.
    pub fn parse(text: &str) -> Self {
        let (byte_order_mark, body) = match text.strip_prefix(BYTE_ORDER_MARK) {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let lines = body
            .split('\n')
            .enumerate()
            .map(|(position, raw)| Line::from_raw(position, raw))
            .collect();

        Self {
            lines,
            separator: Separator::detect(body),
            byte_order_mark,
            source: None,
        }
    }

    /// Attach a source identifier
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn has_byte_order_mark(&self) -> bool {
        self.byte_order_mark
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True for a document parsed from empty input
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].text.is_empty()
    }

    /// Line text at a position
    pub fn line(&self, position: usize) -> Option<&str> {
        self.lines.get(position).map(|line| line.text.as_str())
    }

    /// Rebuild raw text from one text per line
    ///
    /// Each line keeps its own line ending, and the byte order mark is
    /// restored if the input had one.
    pub fn assemble<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> String {
        let mut output = String::new();
        if self.byte_order_mark {
            output.push(BYTE_ORDER_MARK);
        }

        for (index, (line, text)) in self.lines.iter().zip(texts).enumerate() {
            if index > 0 {
                output.push('\n');
            }
            output.push_str(text);
            if line.carriage_return {
                output.push('\r');
            }
        }

        output
    }

    /// Join the lines back together with their original line endings
    pub fn render(&self) -> String {
        self.assemble(self.lines.iter().map(|line| line.text.as_str()))
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
