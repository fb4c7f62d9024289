//! Argument binding, work partitioning, kernel dispatch, and synchronization.
//!
//! Argument binding follows an attempt-all-then-check contract: every
//! positional bind is issued, the per-slot outcomes are collected, and the
//! combined result is inspected exactly once, so a caller sees every
//! misconfigured slot in one error rather than just the first.

use crate::buffers::DeviceBuffer;
use crate::error::{BindFailure, BindFailures, OffloadError};
use oclgemm_core::GemmDims;
use opencl3::command_queue::CommandQueue;
use opencl3::event::Event;
use opencl3::kernel::Kernel;
use opencl3::types::cl_uint;
use std::ptr;
use tracing::debug;

/// The 2-D logical output grid {m, n}: one invocation per (i, j) coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkShape {
    pub m: usize,
    pub n: usize,
}

impl WorkShape {
    /// The output grid for a validated multiplication.
    pub fn for_output(dims: &GemmDims) -> Self {
        Self { m: dims.m, n: dims.n }
    }

    /// Global work sizes, rounded up to a multiple of `local` when an
    /// explicit work-group shape is given. The kernel's bounds guard makes
    /// the overhang invocations no-ops, so coverage of every (i, j) in
    /// [0,m)x[0,n) is preserved.
    pub fn global_for(&self, local: Option<[usize; 2]>) -> [usize; 2] {
        match local {
            Some([lm, ln]) => [self.m.div_ceil(lm) * lm, self.n.div_ceil(ln) * ln],
            None => [self.m, self.n],
        }
    }
}

/// A positional kernel argument: a device buffer handle or a scalar.
#[derive(Debug)]
pub enum KernelArg<'a> {
    Buffer(&'a DeviceBuffer),
    U32(u32),
}

/// Bind every argument to its slot, then inspect the combined outcome once.
pub fn bind_arguments(kernel: &Kernel, args: &[KernelArg<'_>]) -> Result<(), OffloadError> {
    let mut statuses = Vec::with_capacity(args.len());
    for (index, arg) in args.iter().enumerate() {
        let status = unsafe {
            match arg {
                KernelArg::Buffer(buf) => kernel.set_arg(index as cl_uint, &buf.raw()),
                KernelArg::U32(value) => kernel.set_arg(index as cl_uint, value),
            }
        };
        statuses.push((index, status.map_err(|e| e.to_string())));
    }
    check_bind_statuses(statuses)
}

/// Aggregate collected bind outcomes into a single result.
///
/// Split out from [`bind_arguments`] so the aggregation contract is testable
/// without a live kernel object.
pub(crate) fn check_bind_statuses(
    statuses: Vec<(usize, Result<(), String>)>,
) -> Result<(), OffloadError> {
    let failures: Vec<BindFailure> = statuses
        .into_iter()
        .filter_map(|(index, status)| status.err().map(|reason| BindFailure { index, reason }))
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(OffloadError::ArgumentBindingFailed(BindFailures(failures)))
    }
}

/// Enqueue the kernel over the 2-D output grid.
///
/// `local` of `None` lets the runtime pick a work-group shape; an explicit
/// shape (the reference used {1,1}) rounds the global sizes up accordingly.
/// Returns the enqueue event; completion is awaited via [`synchronize`].
pub fn dispatch(
    queue: &CommandQueue,
    kernel: &Kernel,
    shape: &WorkShape,
    local: Option<[usize; 2]>,
) -> Result<Event, OffloadError> {
    if let Some([lm, ln]) = local {
        if lm == 0 || ln == 0 {
            return Err(OffloadError::DispatchFailed(format!(
                "local work shape {lm}x{ln} must be non-zero in both dimensions"
            )));
        }
    }

    let global = shape.global_for(local);
    let local_sizes = local.unwrap_or([0, 0]);
    let local_ptr = if local.is_some() { local_sizes.as_ptr() } else { ptr::null() };

    debug!(
        global_m = global[0],
        global_n = global[1],
        "enqueueing kernel over 2-D grid"
    );

    let event = unsafe {
        queue.enqueue_nd_range_kernel(
            kernel.get(),
            2,
            ptr::null(),
            global.as_ptr(),
            local_ptr,
            &[],
        )
    }
    .map_err(|e| OffloadError::DispatchFailed(e.to_string()))?;

    Ok(event)
}

/// Block until all enqueued work on `queue` completes.
///
/// Used both to guarantee result availability before download and to delimit
/// the device timing interval.
pub fn synchronize(queue: &CommandQueue) -> Result<(), OffloadError> {
    queue
        .finish()
        .map_err(|e| OffloadError::SynchronizationFailed(e.to_string()))
}
