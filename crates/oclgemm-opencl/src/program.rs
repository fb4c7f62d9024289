//! Program compilation and entry-point resolution.

use crate::error::OffloadError;
use crate::source::KernelSource;
use opencl3::context::Context;
use opencl3::kernel::Kernel;
use opencl3::program::Program;
use tracing::debug;

/// Compile `source` for the session's device.
///
/// On failure the compiler's build log is surfaced verbatim in
/// [`OffloadError::CompileFailed`]; opencl3 returns the log as the error
/// payload of `create_and_build_from_source`.
pub fn build_program(context: &Context, source: &KernelSource) -> Result<Program, OffloadError> {
    let program = Program::create_and_build_from_source(context, source.text(), "")
        .map_err(|log| OffloadError::CompileFailed { log })?;
    debug!(bytes = source.len_bytes(), "compiled program from source");
    Ok(program)
}

/// Resolve the named entry point from a compiled program, exactly once.
pub fn resolve_entry_point(program: &Program, name: &str) -> Result<Kernel, OffloadError> {
    Kernel::create(program, name).map_err(|e| OffloadError::EntryPointNotFound {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
