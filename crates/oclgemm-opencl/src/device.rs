//! Platform enumeration and device selection.
//!
//! The default selection requires a GPU-class device, matching the reference
//! behavior. A CPU or any-kind selection exists but must be requested
//! explicitly; there is no silent fallback.

use crate::error::OffloadError;
use opencl3::device::{Device, CL_DEVICE_TYPE_ALL, CL_DEVICE_TYPE_CPU, CL_DEVICE_TYPE_GPU};
use opencl3::platform::{get_platforms, Platform};
use std::fmt;
use tracing::{debug, info};

/// Kind of device to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceKind {
    /// GPU-class devices only (the default).
    #[default]
    Gpu,
    /// CPU devices only. An explicit opt-in, never a silent fallback.
    Cpu,
    /// First device of any kind.
    Any,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu => write!(f, "GPU"),
            Self::Cpu => write!(f, "CPU"),
            Self::Any => write!(f, "any"),
        }
    }
}

/// A selected device together with its parent platform and identity strings.
#[derive(Debug)]
pub struct SelectedDevice {
    pub(crate) device: Device,
    #[allow(dead_code)]
    pub(crate) platform: Platform,
    /// Human-readable device name.
    pub device_name: String,
    /// Human-readable platform name.
    pub platform_name: String,
    /// Device vendor string.
    pub vendor: String,
    /// The kind this device was selected as.
    pub kind: DeviceKind,
}

/// Select the first device of `kind`, scanning platforms in order.
///
/// Fails with [`OffloadError::NoPlatform`] when no OpenCL platform exists and
/// [`OffloadError::NoDevice`] when no platform exposes a matching device.
pub fn select_device(kind: DeviceKind) -> Result<SelectedDevice, OffloadError> {
    let platforms = get_platforms().map_err(|_| OffloadError::NoPlatform)?;
    if platforms.is_empty() {
        return Err(OffloadError::NoPlatform);
    }

    let device_type = match kind {
        DeviceKind::Gpu => CL_DEVICE_TYPE_GPU,
        DeviceKind::Cpu => CL_DEVICE_TYPE_CPU,
        DeviceKind::Any => CL_DEVICE_TYPE_ALL,
    };

    for platform in platforms {
        let platform_name = platform.name().unwrap_or_default();
        debug!("scanning OpenCL platform: {}", platform_name);

        let device_ids = platform.get_devices(device_type).unwrap_or_default();
        for device_id in device_ids {
            let device = Device::new(device_id);
            let device_name = device.name().unwrap_or_default();
            let vendor = device.vendor().unwrap_or_default();
            info!("selected {} device: {} (vendor: {})", kind, device_name, vendor);

            return Ok(SelectedDevice {
                device,
                platform,
                device_name,
                platform_name,
                vendor,
                kind,
            });
        }
    }

    Err(OffloadError::NoDevice { kind })
}
