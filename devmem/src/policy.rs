use devmem_sys::{Context, Device, DeviceSelector, Queue, RuntimeError};

/// Something that names the queue a bulk operation runs on.
pub trait Policy {
    fn queue(&self) -> &Queue;
}

impl Policy for Queue {
    fn queue(&self) -> &Queue {
        self
    }
}

impl<P: Policy + ?Sized> Policy for &P {
    fn queue(&self) -> &Queue {
        (**self).queue()
    }
}

/// Runs bulk operations on one explicitly chosen queue.
#[derive(Clone, Debug, Default)]
pub struct ExecutionPolicy {
    queue: Queue,
}

impl ExecutionPolicy {
    pub fn new(queue: Queue) -> Self {
        Self { queue }
    }

    /// A policy on a new queue for the device `selector` picks
    pub fn from_selector(selector: DeviceSelector) -> Result<Self, RuntimeError> {
        Queue::new(selector).map(Self::new)
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Queue {
        &mut self.queue
    }

    pub fn device(&self) -> Device {
        self.queue.device()
    }

    pub fn context(&self) -> &Context {
        self.queue.context()
    }
}

impl Policy for ExecutionPolicy {
    fn queue(&self) -> &Queue {
        &self.queue
    }
}

impl From<Queue> for ExecutionPolicy {
    fn from(queue: Queue) -> Self {
        Self::new(queue)
    }
}

/// A policy on the configured default device
pub fn device() -> ExecutionPolicy {
    ExecutionPolicy::default()
}

/// A policy on the host device
pub fn host() -> ExecutionPolicy {
    ExecutionPolicy::new(Queue::for_device(Device::host()))
}
