//! End-to-end offloaded multiplication with optional host cross-check.
//!
//! Stage order is strictly linear: dimension validation, device selection,
//! context/queue creation, program build, entry-point resolution, buffer
//! allocation, upload, argument binding, dispatch + synchronize, download,
//! then the optional host reference run. The first failing stage aborts the
//! run; every resource acquired up to that point is released in reverse
//! acquisition order by `Drop` (locals drop in reverse declaration order, the
//! session drops its queue before its context), including on error paths.
//!
//! Timing convention: upload, execute (dispatch + synchronize), and download
//! are measured as three separate wall-clock intervals;
//! [`DeviceTimings::total`] includes the transfers. The host reference is
//! timed with the same helper, so the durations are directly comparable.

use crate::buffers::{AccessMode, DeviceBuffer};
use crate::device::{select_device, DeviceKind};
use crate::dispatch::{bind_arguments, dispatch, synchronize, KernelArg, WorkShape};
use crate::error::OffloadError;
use crate::kernels::MATMUL_ENTRY_POINT;
use crate::program::{build_program, resolve_entry_point};
use crate::session::{DeviceSession, DeviceSummary};
use crate::source::KernelSource;
use oclgemm_core::{matmul_dims, max_relative_error, reference, time_section, Matrix};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Device kind to select; GPU by default, CPU only when explicit.
    pub device_kind: DeviceKind,
    /// Kernel entry point name, consistent across build and resolve.
    pub entry_point: String,
    /// Explicit work-group shape, or `None` to let the runtime choose.
    pub local_work_shape: Option<[usize; 2]>,
    /// Enable profiling on the command queue.
    pub enable_profiling: bool,
    /// Run the sequential host reference and compare results.
    pub verify: bool,
    /// Relative tolerance for the device/host comparison.
    pub rel_tolerance: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            device_kind: DeviceKind::Gpu,
            entry_point: MATMUL_ENTRY_POINT.to_string(),
            local_work_shape: None,
            enable_profiling: false,
            verify: true,
            rel_tolerance: oclgemm_core::DEFAULT_REL_TOLERANCE,
        }
    }
}

/// Separately measured wall-clock intervals of the device path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceTimings {
    /// Blocking host-to-device staging of both operands.
    pub upload: Duration,
    /// Kernel dispatch plus the post-dispatch wait.
    pub execute: Duration,
    /// Blocking device-to-host staging of the result.
    pub download: Duration,
}

impl DeviceTimings {
    /// End-to-end device cost, transfers included.
    pub fn total(&self) -> Duration {
        self.upload + self.execute + self.download
    }
}

/// Outcome of the host reference run and comparison.
#[derive(Debug, Clone, Copy)]
pub struct HostComparison {
    /// Wall-clock cost of the sequential host multiply.
    pub duration: Duration,
    /// Worst element-wise relative error, device vs host.
    pub max_relative_error: f32,
    /// Whether the error stayed within the configured tolerance.
    pub within_tolerance: bool,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone)]
pub struct GemmOutcome {
    /// The offloaded product `A * B`.
    pub output: Matrix,
    /// Identity of the device that executed the kernel.
    pub device: DeviceSummary,
    /// Device-path timing intervals.
    pub timings: DeviceTimings,
    /// Host reference comparison, when verification was enabled.
    pub host: Option<HostComparison>,
}

/// Run the full offload pipeline for `C = A * B`.
///
/// Dimension compatibility is validated before any device resource is
/// touched.
pub fn execute(
    source: &KernelSource,
    a: &Matrix,
    b: &Matrix,
    config: &PipelineConfig,
) -> Result<GemmOutcome, OffloadError> {
    let dims = matmul_dims(a, b)?;
    info!(m = dims.m, n = dims.n, k = dims.k, "starting offloaded multiply");

    let selected = select_device(config.device_kind)?;
    let session = DeviceSession::create(&selected, config.enable_profiling)?;

    let program = build_program(&session.context, source)?;
    let kernel = resolve_entry_point(&program, &config.entry_point)?;
    debug!(entry_point = %config.entry_point, "kernel ready");

    info!("allocating device buffers");
    let mut buf_a = DeviceBuffer::allocate(&session.context, AccessMode::ReadOnly, a.len())?;
    let mut buf_b = DeviceBuffer::allocate(&session.context, AccessMode::ReadOnly, b.len())?;
    let buf_c =
        DeviceBuffer::allocate(&session.context, AccessMode::WriteOnly, dims.m * dims.n)?;

    info!("staging operands to device");
    let (upload_status, upload) = time_section(|| -> Result<(), OffloadError> {
        buf_a.upload(&session.queue, a.as_slice())?;
        buf_b.upload(&session.queue, b.as_slice())?;
        Ok(())
    });
    upload_status?;

    bind_arguments(
        &kernel,
        &[
            KernelArg::Buffer(&buf_a),
            KernelArg::Buffer(&buf_b),
            KernelArg::Buffer(&buf_c),
            KernelArg::U32(dims.m as u32),
            KernelArg::U32(dims.n as u32),
            KernelArg::U32(dims.k as u32),
        ],
    )?;

    info!("dispatching kernel");
    let shape = WorkShape::for_output(&dims);
    let (execute_status, execute) = time_section(|| -> Result<(), OffloadError> {
        let _event = dispatch(&session.queue, &kernel, &shape, config.local_work_shape)?;
        synchronize(&session.queue)
    });
    execute_status?;

    info!("reading result from device");
    let mut output = Matrix::zeros(dims.m, dims.n);
    let (download_status, download) =
        time_section(|| buf_c.download(&session.queue, output.as_mut_slice()));
    download_status?;

    let timings = DeviceTimings { upload, execute, download };

    let host = if config.verify {
        info!("running host reference for cross-check");
        let (host_result, duration) = time_section(|| reference::matmul(a, b));
        let host_result = host_result?;
        let err = max_relative_error(host_result.as_slice(), output.as_slice());
        let comparison = HostComparison {
            duration,
            max_relative_error: err,
            within_tolerance: err <= config.rel_tolerance,
        };
        info!(
            max_rel_error = err,
            host_ms = duration.as_secs_f64() * 1e3,
            device_total_ms = timings.total().as_secs_f64() * 1e3,
            "cross-check complete"
        );
        Some(comparison)
    } else {
        None
    };

    info!("pipeline complete, releasing device resources");
    Ok(GemmOutcome {
        output,
        device: session.summary().clone(),
        timings,
        host,
    })
    // Drop order here: buf_c, buf_b, buf_a, kernel, program, session
    // (queue, then context), exact reverse of acquisition.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_gpu_and_verifies() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.device_kind, DeviceKind::Gpu);
        assert_eq!(cfg.entry_point, MATMUL_ENTRY_POINT);
        assert!(cfg.verify);
        assert!(cfg.local_work_shape.is_none());
        assert_eq!(cfg.rel_tolerance, oclgemm_core::DEFAULT_REL_TOLERANCE);
    }

    #[test]
    fn device_timings_total_includes_transfers() {
        let t = DeviceTimings {
            upload: Duration::from_millis(2),
            execute: Duration::from_millis(5),
            download: Duration::from_millis(3),
        };
        assert_eq!(t.total(), Duration::from_millis(10));
    }

    #[test]
    fn dimension_mismatch_fails_before_any_device_resource() {
        // Runs on machines with no OpenCL stack: the dimension gate must
        // reject the pair before device discovery is even attempted.
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(4, 2);
        let err = execute(&KernelSource::builtin(), &a, &b, &PipelineConfig::default())
            .unwrap_err();
        assert!(matches!(err, OffloadError::Dimension(_)));
    }
}
