//! Command-line harness for the OpenCL GEMM offload pipeline.
//!
//! Loads a kernel source file, runs the offloaded multiply, and cross-checks
//! the result and wall-clock cost against the sequential host reference.
//! Exits 0 on full pipeline success and non-zero on any stage failure, with
//! a diagnostic naming the failing stage.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use oclgemm_core::Matrix;
use oclgemm_opencl::{
    execute, DeviceKind, KernelSource, PipelineConfig, DEFAULT_MAX_SOURCE_BYTES,
    MATMUL_ENTRY_POINT,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Offload a dense f32 matrix multiply to an OpenCL device and compare it
/// against a sequential host reference.
#[derive(Parser)]
#[command(name = "oclgemm", version)]
struct Cli {
    /// Path to the OpenCL C kernel source
    #[arg(long, value_name = "PATH", default_value = "kernels/matrix_multiply.cl")]
    kernel: PathBuf,

    /// Use the embedded kernel source instead of reading a file
    #[arg(long, conflicts_with = "kernel")]
    builtin_kernel: bool,

    /// Kernel entry point name
    #[arg(long, value_name = "NAME", default_value = MATMUL_ENTRY_POINT)]
    entry_point: String,

    /// Rows of A and C
    #[arg(short, value_name = "ROWS", default_value_t = 512)]
    m: usize,

    /// Columns of B and C
    #[arg(short, value_name = "COLS", default_value_t = 512)]
    n: usize,

    /// Columns of A and rows of B
    #[arg(short, value_name = "INNER", default_value_t = 512)]
    k: usize,

    /// Matrix fill strategy
    #[arg(long, value_enum, default_value_t = Fill::Sequential)]
    fill: Fill,

    /// Seed for the random fill
    #[arg(long, value_name = "SEED", default_value_t = 42)]
    seed: u64,

    /// Device kind to select
    #[arg(long, value_enum, default_value_t = DeviceArg::Gpu)]
    device: DeviceArg,

    /// Explicit local work shape, e.g. "16x16" (default: runtime-chosen)
    #[arg(long, value_name = "MxN", value_parser = parse_local_shape)]
    local: Option<[usize; 2]>,

    /// Skip the host reference cross-check
    #[arg(long)]
    no_verify: bool,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Fill {
    /// Element i holds i + 1, the deterministic fixture pattern
    Sequential,
    /// Seeded uniform values in [-1, 1)
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DeviceArg {
    Gpu,
    Cpu,
    Any,
}

impl From<DeviceArg> for DeviceKind {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Gpu => DeviceKind::Gpu,
            DeviceArg::Cpu => DeviceKind::Cpu,
            DeviceArg::Any => DeviceKind::Any,
        }
    }
}

fn parse_local_shape(value: &str) -> Result<[usize; 2], String> {
    let (m, n) = value
        .split_once('x')
        .ok_or_else(|| format!("expected MxN, got '{value}'"))?;
    let m: usize = m.trim().parse().map_err(|_| format!("invalid rows in '{value}'"))?;
    let n: usize = n.trim().parse().map_err(|_| format!("invalid cols in '{value}'"))?;
    if m == 0 || n == 0 {
        return Err("local work shape must be non-zero in both dimensions".to_string());
    }
    Ok([m, n])
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let source = if cli.builtin_kernel {
        KernelSource::builtin()
    } else {
        KernelSource::from_file(&cli.kernel, DEFAULT_MAX_SOURCE_BYTES)
            .context("kernel source loading failed")?
    };

    info!(m = cli.m, n = cli.n, k = cli.k, fill = ?cli.fill, "populating matrices");
    let (a, b) = match cli.fill {
        Fill::Sequential => (
            Matrix::sequential(cli.m, cli.k),
            Matrix::sequential(cli.k, cli.n),
        ),
        Fill::Random => (
            Matrix::random(cli.m, cli.k, cli.seed),
            Matrix::random(cli.k, cli.n, cli.seed.wrapping_add(1)),
        ),
    };

    let config = PipelineConfig {
        device_kind: cli.device.into(),
        entry_point: cli.entry_point.clone(),
        local_work_shape: cli.local,
        enable_profiling: false,
        verify: !cli.no_verify,
        ..Default::default()
    };

    let outcome = execute(&source, &a, &b, &config).context("device offload pipeline failed")?;

    println!(
        "device: {} on {} ({})",
        outcome.device.device_name, outcome.device.platform_name, outcome.device.vendor
    );
    let t = outcome.timings;
    println!(
        "device timings: upload {:.3} ms, execute {:.3} ms, download {:.3} ms, total {:.3} ms",
        t.upload.as_secs_f64() * 1e3,
        t.execute.as_secs_f64() * 1e3,
        t.download.as_secs_f64() * 1e3,
        t.total().as_secs_f64() * 1e3,
    );

    if let Some(host) = outcome.host {
        println!(
            "host reference: {:.3} ms, max relative error {:.3e}",
            host.duration.as_secs_f64() * 1e3,
            host.max_relative_error,
        );
        if !host.within_tolerance {
            bail!(
                "device result diverged from host reference (max relative error {:.3e})",
                host.max_relative_error
            );
        }
        println!("verification: OK");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_local_shape_accepts_mxn() {
        assert_eq!(parse_local_shape("16x16").unwrap(), [16, 16]);
        assert_eq!(parse_local_shape("1x8").unwrap(), [1, 8]);
    }

    #[test]
    fn parse_local_shape_rejects_garbage() {
        assert!(parse_local_shape("16").is_err());
        assert!(parse_local_shape("ax2").is_err());
        assert!(parse_local_shape("0x4").is_err());
    }

    #[test]
    fn cli_parses_defaults() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
