use std::sync::OnceLock;

use crate::{config::Config, context::Context};

use super::{Device, DeviceType};

pub(crate) struct DeviceInfo {
    pub kind: DeviceType,
    pub name: String,
    pub global_mem_size: usize,
    pub default_context: Context,
}

/// The devices the runtime exposes, fixed after first use.
pub(crate) struct Platform {
    devices: Vec<DeviceInfo>,
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

pub(crate) fn platform() -> &'static Platform {
    PLATFORM.get_or_init(|| Platform::new(Config::get()))
}

impl Platform {
    fn new(config: &Config) -> Self {
        let mut devices = Vec::with_capacity(config.gpu_count + 1);

        for i in 0..config.gpu_count {
            devices.push(Self::device_info(
                devices.len(),
                DeviceType::Gpu,
                format!("devmem accelerator {i}"),
                config.device_memory,
            ));
        }
        devices.push(Self::device_info(
            devices.len(),
            DeviceType::Cpu,
            "devmem host".to_owned(),
            config.device_memory,
        ));

        log::debug!(
            "platform initialized with {} accelerator(s), {} bytes each",
            config.gpu_count,
            config.device_memory
        );

        Self { devices }
    }

    fn device_info(
        index: usize,
        kind: DeviceType,
        name: String,
        global_mem_size: usize,
    ) -> DeviceInfo {
        let device = Device::from_id(index as u32);
        DeviceInfo {
            kind,
            name,
            global_mem_size,
            default_context: Context::new(&[device]),
        }
    }

    pub fn devices(&self) -> impl Iterator<Item = Device> + '_ {
        (0..self.devices.len()).map(|id| Device::from_id(id as u32))
    }

    pub fn host_device(&self) -> Device {
        Device::from_id((self.devices.len() - 1) as u32)
    }

    pub fn info(&self, device: Device) -> &DeviceInfo {
        &self.devices[device.id() as usize]
    }
}
