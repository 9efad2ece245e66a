use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RemapError>;

/// Fatal failures of a remap operation
///
/// A position that simply has no mapping is not represented here: it is
/// left untouched in the output.
#[derive(Debug, Error)]
pub enum RemapError {
    /// The source map file does not exist
    #[error("Source map file does not exist: {}", .path.display())]
    MappingTableMissing { path: PathBuf },

    /// The source map content could not be parsed
    #[error("Invalid source map JSON: {origin} ({reason})")]
    MappingTableInvalid { origin: String, reason: String },

    /// The resolver failed while looking up a position
    #[error("Failed to resolve position {line}:{column}: {reason}")]
    Resolution {
        line: u32,
        column: u32,
        reason: String,
    },

    /// Reading an input failed for a reason other than a missing file
    #[error("I/O error reading {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A compiled-file extension cannot be used in the position pattern
    #[error("Invalid file extension: {0:?}")]
    InvalidExtension(String),
}
