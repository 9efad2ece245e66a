// Error types
pub mod error;

// Position types
pub mod position;

// Reference scanning
pub mod scanner;

// Source map file reading
pub mod file;

// Source map lookups
pub mod mapping;

// Remapping engine
pub mod remap;

// JSON output module
pub mod json;

// Re-exports
pub use error::{RemapError, Result};
pub use position::{MappedPosition, OriginalPosition, PositionMatch, Span};
pub use scanner::{DEFAULT_EXTENSIONS, PositionScanner, find_positions};
pub use file::{SourceMapFile, read_source_map};
pub use mapping::{PositionResolver, SourceMapTable};
pub use remap::{
    RemapResult, Substitution,
    lookup, remap, remap_file, remap_matches, remap_with,
};
pub use json::{PositionJson, RemapReport};
