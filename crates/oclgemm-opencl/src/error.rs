//! Error taxonomy for the device offload pipeline.
//!
//! Every pipeline stage maps its failure into exactly one variant here, so a
//! caller (and the process exit diagnostic) can name the failing stage from
//! the error alone. Compile failures carry the full compiler log verbatim.

use crate::device::DeviceKind;
use oclgemm_core::DimensionError;
use std::fmt;
use std::path::PathBuf;

/// One failed positional argument bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindFailure {
    /// Zero-based kernel argument index.
    pub index: usize,
    /// Runtime error text for this bind.
    pub reason: String,
}

/// All argument-bind failures from a single bind pass.
///
/// Binds are attempted for every argument before the combined outcome is
/// inspected once, so this lists every failing slot, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindFailures(pub Vec<BindFailure>);

impl fmt::Display for BindFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for failure in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "arg {}: {}", failure.index, failure.reason)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors from the offload pipeline, one variant per stage outcome.
#[derive(Debug, thiserror::Error)]
pub enum OffloadError {
    #[error("failed to read kernel source '{}': {source}", path.display())]
    SourceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "kernel source '{}' is {size_bytes} bytes, over the {limit_bytes} byte limit",
        path.display()
    )]
    SourceTooLarge { path: PathBuf, size_bytes: u64, limit_bytes: u64 },

    #[error(
        "kernel source '{}' read returned {actual} bytes, expected {expected}",
        path.display()
    )]
    TruncatedSource { path: PathBuf, expected: u64, actual: u64 },

    #[error("no OpenCL platform found")]
    NoPlatform,

    #[error("no {kind} device found on any OpenCL platform")]
    NoDevice { kind: DeviceKind },

    #[error("context creation failed: {0}")]
    ContextCreationFailed(String),

    #[error("command queue creation failed: {0}")]
    QueueCreationFailed(String),

    #[error("kernel compilation failed, compiler log:\n{log}")]
    CompileFailed { log: String },

    #[error("entry point '{name}' not found in compiled program: {reason}")]
    EntryPointNotFound { name: String, reason: String },

    #[error("buffer allocation ({size_bytes} bytes) failed: {reason}")]
    BufferAllocationFailed { size_bytes: usize, reason: String },

    #[error("data transfer failed: {0}")]
    TransferFailed(String),

    #[error("argument binding failed: {0}")]
    ArgumentBindingFailed(BindFailures),

    #[error("kernel dispatch failed: {0}")]
    DispatchFailed(String),

    #[error("queue synchronization failed: {0}")]
    SynchronizationFailed(String),

    #[error(transparent)]
    Dimension(#[from] DimensionError),
}
