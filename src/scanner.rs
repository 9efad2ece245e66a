use crate::error::{RemapError, Result};
use crate::position::{PositionMatch, Span};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Compiled-file extensions recognized when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["js"];

/// Characters that terminate a path token
const PATH_BREAKS: &[char] = &[':', '(', ')'];

static DEFAULT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([^\s:()]+\.js):(\d+)(?::(\d+))?").expect("default position pattern is valid")
});

/// Finds `file.js:line[:column]` references in free text
///
/// A reference is a path token (no whitespace, `:` or parentheses) ending in
/// one of the configured extensions, a line number and an optional column.
/// Matches come out left to right and never overlap.
#[derive(Debug, Clone)]
pub struct PositionScanner {
    pattern: Regex,
    extensions: Vec<String>,
}

impl Default for PositionScanner {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl PositionScanner {
    /// Build a scanner for the given extensions (leading dots are optional)
    ///
    /// # Arguments
    /// * `extensions` - Compiled-file extensions such as `js` or `.mjs`; an
    ///   empty slice selects the defaults
    ///
    /// # Returns
    /// * `Ok(PositionScanner)` matching any of the extensions
    /// * `Err(RemapError::InvalidExtension)` if an extension is empty or
    ///   contains a character that cannot appear in a path token
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Result<Self> {
        if extensions.is_empty() {
            return Ok(Self::default());
        }

        // Strip dots and reject characters a path token cannot hold
        let extensions = extensions
            .iter()
            .map(|e| normalize_extension(e.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        // Build one alternation over the escaped extensions
        let alternation = extensions
            .iter()
            .map(|e| regex::escape(e))
            .collect::<Vec<_>>()
            .join("|");
        let source = format!(r"([^\s:()]+\.(?:{})):(\d+)(?::(\d+))?", alternation);
        let pattern =
            Regex::new(&source).map_err(|e| RemapError::InvalidExtension(e.to_string()))?;

        Ok(Self {
            pattern,
            extensions,
        })
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Lazily enumerate the references in `text`
    ///
    /// Each call rescans from the start of `text`.
    pub fn scan<'a>(&'a self, text: &'a str) -> impl Iterator<Item = PositionMatch> + 'a {
        self.pattern.captures_iter(text).filter_map(to_position_match)
    }
}

/// Scan with the default `.js` pattern
pub fn find_positions(text: &str) -> Vec<PositionMatch> {
    PositionScanner::default().scan(text).collect()
}

fn normalize_extension(raw: &str) -> Result<String> {
    let ext = raw.strip_prefix('.').unwrap_or(raw);

    if ext.is_empty() || ext.chars().any(|c| c.is_whitespace() || PATH_BREAKS.contains(&c)) {
        return Err(RemapError::InvalidExtension(raw.to_string()));
    }

    Ok(ext.to_string())
}

/// Positive integer that fits the resolver's coordinate type
fn parse_positive(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|n| *n >= 1)
}

fn to_position_match(caps: Captures<'_>) -> Option<PositionMatch> {
    let whole = caps.get(0)?;
    let line = parse_positive(caps.get(2)?.as_str())?;
    let (column, column_explicit) = match caps.get(3) {
        Some(c) => (parse_positive(c.as_str())?, true),
        None => (1, false),
    };

    Some(PositionMatch {
        full_text: whole.as_str().to_string(),
        file: caps.get(1)?.as_str().to_string(),
        line,
        column,
        column_explicit,
        span: Span {
            byte_start: whole.start(),
            byte_end: whole.end(),
        },
    })
}
