use std::{
    hash::{Hash, Hasher},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::device::Device;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A set of devices that allocations and queues are bound to.
///
/// Clones refer to the same context. Two contexts created separately are never
/// equal, even when they contain the same devices.
#[derive(Clone, Debug)]
pub struct Context {
    id: u64,
    devices: Arc<[Device]>,
}

impl Context {
    pub fn new(devices: &[Device]) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!("created context {id} for {} device(s)", devices.len());
        Self {
            id,
            devices: devices.into(),
        }
    }

    /// The default context of `device`
    pub fn default_for(device: &Device) -> Self {
        device.default_context()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn contains(&self, device: &Device) -> bool {
        self.devices.contains(device)
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Context {}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
