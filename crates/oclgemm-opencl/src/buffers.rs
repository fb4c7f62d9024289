//! Device buffer allocation and blocking host/device transfers.

use crate::error::OffloadError;
use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::memory::{Buffer, ClMem, CL_MEM_READ_ONLY, CL_MEM_WRITE_ONLY};
use opencl3::types::{cl_mem, cl_mem_flags, CL_BLOCKING};
use std::ptr;

/// Buffer access mode from the device's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Device reads, host writes (kernel inputs).
    ReadOnly,
    /// Device writes, host reads (kernel outputs).
    WriteOnly,
}

impl AccessMode {
    fn to_flags(self) -> cl_mem_flags {
        match self {
            Self::ReadOnly => CL_MEM_READ_ONLY,
            Self::WriteOnly => CL_MEM_WRITE_ONLY,
        }
    }
}

/// A device-resident `f32` allocation with a fixed element count.
///
/// Created before any argument bind references it; released (via `Drop`) only
/// after the dispatches using it have completed.
pub struct DeviceBuffer {
    buffer: Buffer<f32>,
    len: usize,
    mode: AccessMode,
}

impl DeviceBuffer {
    /// Allocate an uninitialized device buffer for `len` f32 elements.
    pub fn allocate(
        context: &Context,
        mode: AccessMode,
        len: usize,
    ) -> Result<Self, OffloadError> {
        let buffer = unsafe {
            Buffer::<f32>::create(context, mode.to_flags(), len, ptr::null_mut())
        }
        .map_err(|e| OffloadError::BufferAllocationFailed {
            size_bytes: len * std::mem::size_of::<f32>(),
            reason: e.to_string(),
        })?;
        Ok(Self { buffer, len, mode })
    }

    /// Copy `data` into the device buffer, blocking until the transfer
    /// completes (a synchronization point usable for timing).
    ///
    /// A host/device length mismatch fails before anything is enqueued.
    pub fn upload(&mut self, queue: &CommandQueue, data: &[f32]) -> Result<(), OffloadError> {
        if data.len() != self.len {
            return Err(OffloadError::TransferFailed(format!(
                "host slice holds {} elements, device buffer holds {}",
                data.len(),
                self.len
            )));
        }
        unsafe { queue.enqueue_write_buffer(&mut self.buffer, CL_BLOCKING, 0, data, &[]) }
            .map_err(|e| OffloadError::TransferFailed(e.to_string()))?;
        Ok(())
    }

    /// Copy the device buffer into `dest`, blocking until complete.
    pub fn download(&self, queue: &CommandQueue, dest: &mut [f32]) -> Result<(), OffloadError> {
        if dest.len() != self.len {
            return Err(OffloadError::TransferFailed(format!(
                "host slice holds {} elements, device buffer holds {}",
                dest.len(),
                self.len
            )));
        }
        unsafe { queue.enqueue_read_buffer(&self.buffer, CL_BLOCKING, 0, dest, &[]) }
            .map_err(|e| OffloadError::TransferFailed(e.to_string()))?;
        Ok(())
    }

    /// Element count.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocation size in bytes.
    pub fn byte_size(&self) -> usize {
        self.len * std::mem::size_of::<f32>()
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Raw memory handle for argument binding.
    pub(crate) fn raw(&self) -> cl_mem {
        self.buffer.get()
    }
}

impl std::fmt::Debug for DeviceBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceBuffer")
            .field("len", &self.len)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_mode_maps_to_cl_flags() {
        assert_eq!(AccessMode::ReadOnly.to_flags(), CL_MEM_READ_ONLY);
        assert_eq!(AccessMode::WriteOnly.to_flags(), CL_MEM_WRITE_ONLY);
    }
}
