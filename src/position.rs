/// Byte span in a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Starting byte offset
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.byte_end - self.byte_start
    }

    pub fn is_empty(&self) -> bool {
        self.byte_end == self.byte_start
    }
}

/// A `file:line[:column]` reference found in a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMatch {
    /// Exact matched substring, e.g. `app.js:10:5`
    pub full_text: String,
    /// Path token preceding the line number
    pub file: String,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed); 1 when the message omitted it
    pub column: u32,
    /// Whether the column was written in the message
    pub column_explicit: bool,
    /// Location of `full_text` in the unmodified message
    pub span: Span,
}

/// Original position as reported by a resolver
///
/// Coordinates are 0-indexed, the way source maps store them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
    pub source: String,
    pub line: u32,
    pub column: Option<u32>,
    pub name: Option<String>,
}

/// Resolved position of a match, in 1-indexed coordinates
///
/// `source` and `line` are either both present or both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedPosition {
    pub source: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub name: Option<String>,
}

impl MappedPosition {
    /// No mapping exists for the queried position
    pub fn unmapped() -> Self {
        Self::default()
    }

    pub fn is_mapped(&self) -> bool {
        self.source.is_some() && self.line.is_some()
    }

    /// Render as `source:line[:column]`, or `None` when unmapped
    pub fn format(&self) -> Option<String> {
        let (source, line) = match (&self.source, self.line) {
            (Some(source), Some(line)) => (source, line),
            _ => return None,
        };

        Some(match self.column {
            Some(column) => format!("{}:{}:{}", source, line, column),
            None => format!("{}:{}", source, line),
        })
    }
}
