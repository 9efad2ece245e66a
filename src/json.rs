use crate::remap::{RemapResult, Substitution};
use serde::{Deserialize, Serialize};

/// Machine-readable outcome of one remap run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapReport {
    pub success: bool,
    /// Remapped message (empty on failure)
    pub output: String,
    /// Absolute path of the source map used
    pub sourcemap: String,
    /// BLAKE3 hash of the source map content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcemap_checksum: Option<String>,
    pub mapped_count: usize,
    pub unmapped_count: usize,
    pub total_byte_shift: isize,
    pub positions: Vec<PositionJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-reference entry of a [`RemapReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionJson {
    /// Reference as written in the message
    pub original: String,
    pub replacement: String,
    /// "mapped" or "unmapped"
    pub status: String,
    /// Byte offset of the reference in the original message
    pub byte_offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&Substitution> for PositionJson {
    fn from(sub: &Substitution) -> Self {
        let status = if sub.is_mapped() { "mapped" } else { "unmapped" };

        Self {
            original: sub.position.full_text.clone(),
            replacement: sub.replacement.clone(),
            status: status.to_string(),
            byte_offset: sub.position.span.byte_start,
            source: sub.mapped.source.clone(),
            line: sub.mapped.line,
            column: sub.mapped.column,
            name: sub.mapped.name.clone(),
        }
    }
}

impl RemapReport {
    pub fn success(sourcemap: String, sourcemap_checksum: String, result: &RemapResult) -> Self {
        Self {
            success: true,
            output: result.text.clone(),
            sourcemap,
            sourcemap_checksum: Some(sourcemap_checksum),
            mapped_count: result.mapped_count,
            unmapped_count: result.unmapped_count,
            total_byte_shift: result.total_byte_shift,
            positions: result.substitutions.iter().map(PositionJson::from).collect(),
            error: None,
        }
    }

    pub fn failure(sourcemap: String, error: String) -> Self {
        Self {
            success: false,
            output: String::new(),
            sourcemap,
            sourcemap_checksum: None,
            mapped_count: 0,
            unmapped_count: 0,
            total_byte_shift: 0,
            positions: Vec::new(),
            error: Some(error),
        }
    }
}
