use std::fmt;
use std::path::Path;
use serde::Serialize;
use crate::config::DevicePreference;

/// Compute device a pipeline is bound to for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Cuda(usize),
}

impl Device {
    /// Resolve a preference against the hardware visible right now.
    pub fn resolve(preference: DevicePreference) -> Self {
        Self::resolve_with(preference, accelerator_available())
    }

    fn resolve_with(preference: DevicePreference, accelerator: bool) -> Self {
        match preference {
            DevicePreference::Cpu => Device::Cpu,
            DevicePreference::Auto if accelerator => Device::Cuda(0),
            DevicePreference::Auto => Device::Cpu,
            DevicePreference::Gpu if accelerator => Device::Cuda(0),
            DevicePreference::Gpu => {
                tracing::warn!("GPU requested but no accelerator was detected, falling back to CPU");
                Device::Cpu
            }
        }
    }

    pub fn is_accelerated(&self) -> bool {
        matches!(self, Device::Cuda(_))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(ordinal) => write!(f, "cuda:{}", ordinal),
        }
    }
}

fn accelerator_available() -> bool {
    if let Ok(visible) = std::env::var("CUDA_VISIBLE_DEVICES") {
        let visible = visible.trim();
        if visible.is_empty() || visible == "-1" {
            return false;
        }
    }
    Path::new("/dev/nvidia0").exists()
}
