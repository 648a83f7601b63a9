use std::fmt;

use crate::context::Context;

mod platform;
mod selector;

pub(crate) use platform::platform;
pub use selector::DeviceSelector;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// An accelerator with its own global memory
    Gpu,
    /// The host processor
    Cpu,
}

/// A device of the platform. Cheap to copy, compared by identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Device {
    id: u32,
}

impl Device {
    pub(crate) const fn from_id(id: u32) -> Self {
        Self { id }
    }

    /// All devices of the platform, accelerators first.
    pub fn all() -> Vec<Device> {
        platform().devices().collect()
    }

    /// The host device. Always present.
    pub fn host() -> Device {
        platform().host_device()
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> DeviceType {
        platform().info(*self).kind
    }

    pub fn is_gpu(&self) -> bool {
        self.kind() == DeviceType::Gpu
    }

    pub fn is_cpu(&self) -> bool {
        self.kind() == DeviceType::Cpu
    }

    pub fn name(&self) -> &'static str {
        &platform().info(*self).name
    }

    /// Size of the device's global memory, in bytes
    pub fn global_mem_size(&self) -> usize {
        platform().info(*self).global_mem_size
    }

    /// The context every queue built from just this device shares
    pub fn default_context(&self) -> Context {
        platform().info(*self).default_context.clone()
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Device").field(&self.id).finish()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id)
    }
}
