//! OpenCL host pipeline for offloaded dense matrix multiplication.
//!
//! The pipeline is strictly linear: load kernel source, select a device,
//! create a context and command queue, compile the program and resolve its
//! entry point, allocate device buffers, stage operands in, bind arguments,
//! dispatch over the 2-D output grid, synchronize, and stage the result out.
//! Any stage failure aborts the run; resources already acquired are released
//! in reverse order by ownership.
//!
//! All device handles are threaded through explicit values (no globals), so
//! independent pipelines can coexist in one process.

pub mod buffers;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod kernels;
pub mod pipeline;
pub mod program;
pub mod session;
pub mod source;

pub use buffers::{AccessMode, DeviceBuffer};
pub use device::{select_device, DeviceKind, SelectedDevice};
pub use dispatch::{bind_arguments, dispatch, synchronize, KernelArg, WorkShape};
pub use error::{BindFailure, BindFailures, OffloadError};
pub use kernels::{MATMUL_ENTRY_POINT, MATMUL_SOURCE};
pub use pipeline::{execute, DeviceTimings, GemmOutcome, HostComparison, PipelineConfig};
pub use program::{build_program, resolve_entry_point};
pub use session::{DeviceSession, DeviceSummary};
pub use source::{KernelSource, DEFAULT_MAX_SOURCE_BYTES};
