//! Common types and host-side utilities for the GEMM offload harness.
//!
//! This crate provides the foundational pieces shared by the OpenCL backend
//! and the CLI: the row-major [`Matrix`] data model, the sequential CPU
//! reference multiply used as a correctness oracle and timing baseline, and
//! wall-clock timing helpers. It has no OpenCL dependency.

pub mod matrix;
pub mod reference;
pub mod timing;

pub use matrix::{matmul_dims, DimensionError, GemmDims, Matrix};
pub use reference::{max_relative_error, DEFAULT_REL_TOLERANCE};
pub use timing::time_section;
