//! Execution context and command queue lifecycle.
//!
//! A [`DeviceSession`] bundles the context and its single in-order command
//! queue. The queue is the sole mutation point for device state; all
//! transfers and dispatches go through it in program order.

use crate::device::{DeviceKind, SelectedDevice};
use crate::error::OffloadError;
use opencl3::command_queue::{CommandQueue, CL_QUEUE_PROFILING_ENABLE};
use opencl3::context::Context;
use tracing::debug;

/// Identity of the device a session runs on, for logging and reports.
#[derive(Debug, Clone)]
pub struct DeviceSummary {
    pub platform_name: String,
    pub device_name: String,
    pub vendor: String,
    pub kind: DeviceKind,
}

/// A context plus a command queue bound to the same device.
///
/// Field order matters: the queue is declared before the context so it is
/// dropped (released) first, keeping the context alive for every resource
/// derived from it.
pub struct DeviceSession {
    pub(crate) queue: CommandQueue,
    pub(crate) context: Context,
    summary: DeviceSummary,
}

impl DeviceSession {
    /// Create a context on the selected device and an in-order command queue
    /// bound to it.
    pub fn create(selected: &SelectedDevice, enable_profiling: bool) -> Result<Self, OffloadError> {
        let context = Context::from_device(&selected.device)
            .map_err(|e| OffloadError::ContextCreationFailed(e.to_string()))?;

        let properties = if enable_profiling { CL_QUEUE_PROFILING_ENABLE } else { 0 };
        let queue = CommandQueue::create_default_with_properties(&context, properties, 0)
            .map_err(|e| OffloadError::QueueCreationFailed(e.to_string()))?;

        debug!(
            device = %selected.device_name,
            platform = %selected.platform_name,
            "created context and command queue"
        );

        Ok(Self {
            queue,
            context,
            summary: DeviceSummary {
                platform_name: selected.platform_name.clone(),
                device_name: selected.device_name.clone(),
                vendor: selected.vendor.clone(),
                kind: selected.kind,
            },
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn summary(&self) -> &DeviceSummary {
        &self.summary
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("platform", &self.summary.platform_name)
            .field("device", &self.summary.device_name)
            .finish()
    }
}
