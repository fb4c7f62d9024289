//! Kernel source loading.
//!
//! Reads a compute-kernel program's text from disk into an immutable blob.
//! Oversized files fail explicitly instead of being silently truncated: the
//! size is queried up front and checked against a configurable limit, and the
//! byte count actually read is verified against it afterwards.

use crate::error::OffloadError;
use crate::kernels::MATMUL_SOURCE;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default upper bound on kernel source size: 1 MiB.
pub const DEFAULT_MAX_SOURCE_BYTES: u64 = 1 << 20;

/// An immutable kernel source text blob.
///
/// Owned by the loader until handed to the program builder, which derives a
/// compiled artifact from it without mutating the text.
#[derive(Debug, Clone)]
pub struct KernelSource {
    text: String,
}

impl KernelSource {
    /// Load kernel source from `path`, failing on anything but a complete
    /// read of a file within `max_bytes`.
    ///
    /// The file handle is closed before this returns (scoped by `fs::read`).
    pub fn from_file(path: &Path, max_bytes: u64) -> Result<Self, OffloadError> {
        let metadata = fs::metadata(path).map_err(|source| OffloadError::SourceIo {
            path: path.to_path_buf(),
            source,
        })?;

        let expected = metadata.len();
        if expected > max_bytes {
            return Err(OffloadError::SourceTooLarge {
                path: path.to_path_buf(),
                size_bytes: expected,
                limit_bytes: max_bytes,
            });
        }

        let text = fs::read_to_string(path).map_err(|source| OffloadError::SourceIo {
            path: path.to_path_buf(),
            source,
        })?;

        // Regular files read in full; anything shorter means the metadata
        // size was a lie (special file, concurrent truncation).
        let actual = text.len() as u64;
        if actual < expected {
            return Err(OffloadError::TruncatedSource {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }

        debug!(path = %path.display(), bytes = actual, "loaded kernel source");
        Ok(Self { text })
    }

    /// The embedded default matrix multiply source.
    pub fn builtin() -> Self {
        Self { text: MATMUL_SOURCE.to_string() }
    }

    /// Wrap an in-memory source string (tests, generated kernels).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The program text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte length of the program text.
    pub fn len_bytes(&self) -> usize {
        self.text.len()
    }
}
