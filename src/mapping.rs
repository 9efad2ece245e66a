//! Source map lookups
//!
//! [`PositionResolver`] is the seam between the remapper and whatever knows
//! how generated positions relate to original ones. [`SourceMapTable`] is the
//! implementation backed by a parsed Source Map v3 document.

use crate::error::{RemapError, Result};
use crate::file::SourceMapFile;
use crate::position::OriginalPosition;
use sourcemap::SourceMap;

/// Resolves generated positions to original positions
///
/// Both the query and the answer use 0-indexed lines and columns. `Ok(None)`
/// means the position has no mapping; `Err` is reserved for lookups that
/// could not be performed at all.
pub trait PositionResolver {
    fn resolve(&self, line: u32, column: u32) -> Result<Option<OriginalPosition>>;
}

impl<F> PositionResolver for F
where
    F: Fn(u32, u32) -> Result<Option<OriginalPosition>>,
{
    fn resolve(&self, line: u32, column: u32) -> Result<Option<OriginalPosition>> {
        self(line, column)
    }
}

/// A parsed source map, held for the duration of one remap operation
pub struct SourceMapTable {
    map: SourceMap,
    origin: String,
}

impl SourceMapTable {
    /// Parse a source map held in memory
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::parse("<memory>", bytes)
    }

    /// Parse a source map read from disk
    pub fn from_file(file: &SourceMapFile) -> Result<Self> {
        Self::parse(file.path.display().to_string(), &file.bytes)
    }

    fn parse(origin: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let origin = origin.into();
        let map = SourceMap::from_slice(bytes).map_err(|e| RemapError::MappingTableInvalid {
            origin: origin.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!(
            origin = %origin,
            tokens = map.get_token_count(),
            sources = map.get_source_count(),
            "parsed source map"
        );

        Ok(Self { map, origin })
    }

    /// Where the map came from (a path, or `<memory>`)
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn token_count(&self) -> u32 {
        self.map.get_token_count()
    }
}

impl PositionResolver for SourceMapTable {
    /// Nearest mapping at or before `column` on the same generated line
    fn resolve(&self, line: u32, column: u32) -> Result<Option<OriginalPosition>> {
        let token = match self.map.lookup_token(line, column) {
            // lookup_token may fall back to an earlier line
            Some(token) if token.get_dst_line() == line => token,
            _ => return Ok(None),
        };

        let Some(source) = token.get_source() else {
            return Ok(None);
        };

        Ok(Some(OriginalPosition {
            source: source.to_string(),
            line: token.get_src_line(),
            column: Some(token.get_src_col()),
            name: token.get_name().map(str::to_string),
        }))
    }
}

impl Drop for SourceMapTable {
    fn drop(&mut self) {
        tracing::trace!(origin = %self.origin, "released source map");
    }
}
