use crate::device::DeviceSelector;

/// Errors returned when device memory cannot be reserved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// The device does not have enough free global memory left.
    #[error("out of device memory: requested {requested} bytes, but only {available} available on device {device}")]
    OutOfMemory {
        requested: usize,
        available: usize,
        device: u32,
    },

    /// The backing memory could not satisfy the request.
    #[error("backing memory exhausted while allocating {requested} bytes")]
    Exhausted { requested: usize },

    /// The requested size does not fit in the address space.
    #[error("allocation size overflows the address space")]
    SizeOverflow,

    #[error("alignment {align} is not a power of two")]
    InvalidAlignment { align: usize },

    #[error("device {device} is not part of context {context}")]
    DeviceNotInContext { device: u32, context: u64 },
}

/// Errors returned while setting up devices and queues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("no device matches selector {0:?}")]
    NoDevice(DeviceSelector),

    #[error("device {device} is not part of context {context}")]
    DeviceNotInContext { device: u32, context: u64 },
}

/// Errors returned while reading or installing the runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("the runtime configuration was already initialized")]
    AlreadyInitialized,
}
