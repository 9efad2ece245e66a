use crate::error::{RemapError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Source map file read into memory
#[derive(Debug, Clone)]
pub struct SourceMapFile {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Raw file content
    pub bytes: Vec<u8>,
    /// Byte length of the content
    pub len: usize,
    /// BLAKE3 hash of the content (hex-encoded)
    pub checksum: String,
}

/// Read a source map file from disk
///
/// The path is made absolute first so that error messages name the file
/// unambiguously.
///
/// # Arguments
/// * `path` - Path to the `.map` file, relative or absolute
///
/// # Returns
/// * `Ok(SourceMapFile)` - File content with metadata
/// * `Err(RemapError::MappingTableMissing)` - No file at `path`
/// * `Err(RemapError::Io)` - The file exists but could not be read
pub fn read_source_map<P: AsRef<Path>>(path: P) -> Result<SourceMapFile> {
    // Make the path absolute
    let path = absolute_path(path.as_ref());

    // Check if file exists
    if !path.exists() {
        return Err(RemapError::MappingTableMissing { path });
    }

    // Read raw bytes
    let bytes = fs::read(&path).map_err(|source| RemapError::Io {
        path: path.clone(),
        source,
    })?;

    // Compute BLAKE3 checksum
    let checksum = blake3::hash(&bytes).to_hex().to_string();

    tracing::debug!(path = %path.display(), len = bytes.len(), "read source map");

    Ok(SourceMapFile {
        len: bytes.len(),
        path,
        bytes,
        checksum,
    })
}

fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
