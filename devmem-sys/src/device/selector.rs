use std::str::FromStr;

use crate::{config::DEFAULT_DEVICE_ENV, error::ConfigError, error::RuntimeError};

use super::{platform, Device, DeviceType};

/// Picks a device of the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeviceSelector {
    /// The first accelerator, or the host if there is none
    #[default]
    Default,
    /// The first accelerator
    Gpu,
    /// The host
    Cpu,
}

impl DeviceSelector {
    pub fn select(self) -> Result<Device, RuntimeError> {
        let mut devices = platform().devices();
        let device = match self {
            DeviceSelector::Default => devices.next(),
            DeviceSelector::Gpu => devices.find(|d| d.kind() == DeviceType::Gpu),
            DeviceSelector::Cpu => devices.find(|d| d.kind() == DeviceType::Cpu),
        };
        device.ok_or(RuntimeError::NoDevice(self))
    }
}

impl FromStr for DeviceSelector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(DeviceSelector::Default),
            "gpu" => Ok(DeviceSelector::Gpu),
            "cpu" | "host" => Ok(DeviceSelector::Cpu),
            _ => Err(ConfigError::InvalidValue {
                key: DEFAULT_DEVICE_ENV,
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DeviceSelector;
    use crate::device::{Device, DeviceType};

    #[test]
    fn cpu_always_available() {
        assert_eq!(DeviceSelector::Cpu.select(), Ok(Device::host()));
    }

    #[test]
    fn default_prefers_accelerators() {
        let device = DeviceSelector::Default.select().unwrap();
        match DeviceSelector::Gpu.select() {
            Ok(gpu) => assert_eq!(device, gpu),
            Err(_) => assert_eq!(device.kind(), DeviceType::Cpu),
        }
    }
}
