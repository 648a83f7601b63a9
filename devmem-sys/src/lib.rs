//! Accelerator runtime used by `devmem`.
//!
//! Exposes devices, contexts, in-order queues and device (USM) allocations.
//! Device memory is backed by host heap allocations tracked in a process-wide
//! registry, so every address handed out can be mapped back to the device and
//! context it was allocated from.

pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod queue;
pub mod usm;

pub use config::{default_selector, Config};
pub use context::Context;
pub use device::{Device, DeviceSelector, DeviceType};
pub use error::{AllocError, ConfigError, RuntimeError};
pub use queue::{Event, Queue};
pub use usm::{
    aligned_alloc_device, device_memory_in_use, free, malloc_device, pointer_info, PointerInfo,
    DEFAULT_ALIGNMENT,
};
