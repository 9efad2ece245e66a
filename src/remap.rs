use crate::error::{RemapError, Result};
use crate::file::read_source_map;
use crate::mapping::{PositionResolver, SourceMapTable};
use crate::position::{MappedPosition, PositionMatch};
use crate::scanner::PositionScanner;
use std::path::Path;

/// One position reference and what it was replaced with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The reference as found in the message
    pub position: PositionMatch,
    /// Where it resolved to (all fields absent when unmapped)
    pub mapped: MappedPosition,
    /// Text written in place of the reference
    pub replacement: String,
    /// Byte shift introduced by this replacement
    pub byte_shift: isize,
}

impl Substitution {
    pub fn is_mapped(&self) -> bool {
        self.mapped.is_mapped()
    }
}

/// Result of remapping one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapResult {
    /// Message with every mapped reference rewritten
    pub text: String,
    /// One entry per reference, in message order
    pub substitutions: Vec<Substitution>,
    /// Total byte shift across all replacements
    pub total_byte_shift: isize,
    /// Number of references that resolved
    pub mapped_count: usize,
    /// Number of references left untouched
    pub unmapped_count: usize,
}

impl RemapResult {
    pub fn new(text: String, substitutions: Vec<Substitution>, total_byte_shift: isize) -> Self {
        let mapped_count = substitutions.iter().filter(|s| s.is_mapped()).count();
        let unmapped_count = substitutions.len() - mapped_count;

        Self {
            text,
            substitutions,
            total_byte_shift,
            mapped_count,
            unmapped_count,
        }
    }
}

/// Resolve one reference, translating between coordinate conventions
///
/// References are 1-indexed; resolvers are 0-indexed on both axes. This is
/// the only place the two meet.
///
/// # Arguments
/// * `resolver` - Lookup backed by a source map (or any other table)
/// * `position` - Reference found in the message
///
/// # Returns
/// * `Ok(MappedPosition)` - 1-indexed original position, or all-absent when unmapped
/// * `Err(RemapError::Resolution)` - The resolver failed, or reported a
///   position that has no 1-indexed equivalent
pub fn lookup<R: PositionResolver + ?Sized>(
    resolver: &R,
    position: &PositionMatch,
) -> Result<MappedPosition> {
    // Query in 0-indexed coordinates
    let original = resolver.resolve(
        position.line.saturating_sub(1),
        position.column.saturating_sub(1),
    )?;

    let Some(original) = original else {
        return Ok(MappedPosition::unmapped());
    };

    // Shift the answer back to 1-indexed coordinates
    let out_of_range = || RemapError::Resolution {
        line: position.line,
        column: position.column,
        reason: format!(
            "original position {}:{} in {} is out of range",
            original.line,
            original.column.map_or_else(|| "-".to_string(), |c| c.to_string()),
            original.source
        ),
    };
    let line = original.line.checked_add(1).ok_or_else(out_of_range)?;
    let column = match original.column {
        Some(c) => Some(c.checked_add(1).ok_or_else(out_of_range)?),
        None => None,
    };

    Ok(MappedPosition {
        source: Some(original.source),
        line: Some(line),
        column,
        name: original.name,
    })
}

/// Replace every reference in `text` with its resolved position
///
/// References are processed strictly left to right. Each replacement may be
/// longer or shorter than the reference it replaces, so the running byte
/// shift is added to every later reference's original span before splicing.
///
/// # Arguments
/// * `text` - The unmodified message
/// * `positions` - References found in `text`, in increasing offset order
/// * `resolver` - Lookup used for every reference
///
/// # Returns
/// * `Ok(RemapResult)` - Rewritten text plus per-reference details
/// * `Err(RemapError)` - The resolver failed; no partial text is returned
pub fn remap_matches<I, R>(text: &str, positions: I, resolver: &R) -> Result<RemapResult>
where
    I: IntoIterator<Item = PositionMatch>,
    R: PositionResolver + ?Sized,
{
    let mut result = text.to_string();
    let mut shift = 0isize;
    let mut substitutions = Vec::new();

    for position in positions {
        debug_assert!(!position.span.is_empty());

        // Step 1: Resolve and format the replacement
        let mapped = lookup(resolver, &position)?;
        let replacement = mapped
            .format()
            .unwrap_or_else(|| position.full_text.clone());

        // Step 2: Move the original span by everything spliced so far
        let start = position.span.byte_start.saturating_add_signed(shift);
        let end = position.span.byte_end.saturating_add_signed(shift);
        debug_assert_eq!(&result[start..end], position.full_text);

        if mapped.is_mapped() {
            tracing::debug!(from = %position.full_text, to = %replacement, "remapped position");
        } else {
            tracing::debug!(position = %position.full_text, "no mapping for position");
        }

        // Step 3: Splice
        result.replace_range(start..end, &replacement);

        // Step 4: Accumulate the length change
        let byte_shift = replacement.len() as isize - position.span.len() as isize;
        shift += byte_shift;

        substitutions.push(Substitution {
            position,
            mapped,
            replacement,
            byte_shift,
        });
    }

    Ok(RemapResult::new(result, substitutions, shift))
}

/// Scan `text` with `scanner` and remap what it finds through `resolver`
pub fn remap_with<R>(text: &str, scanner: &PositionScanner, resolver: &R) -> Result<RemapResult>
where
    R: PositionResolver + ?Sized,
{
    remap_matches(text, scanner.scan(text), resolver)
}

/// Remap `text` against an in-memory source map
pub fn remap(text: &str, map_bytes: &[u8]) -> Result<String> {
    let table = SourceMapTable::from_slice(map_bytes)?;
    let result = remap_with(text, &PositionScanner::default(), &table)?;
    Ok(result.text)
}

/// Remap `text` against the source map at `map_path`
pub fn remap_file<P: AsRef<Path>>(text: &str, map_path: P) -> Result<String> {
    let file = read_source_map(map_path)?;
    let table = SourceMapTable::from_file(&file)?;
    let result = remap_with(text, &PositionScanner::default(), &table)?;
    Ok(result.text)
}
