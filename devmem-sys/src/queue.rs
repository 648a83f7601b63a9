use bytemuck::Pod;

use crate::{
    config::default_selector,
    context::Context,
    device::{platform, Device, DeviceSelector},
    error::RuntimeError,
};

/// An in-order queue bound to one device and one context.
///
/// Every submission runs to completion before the submitting call returns, the
/// returned [`Event`] only marks that point.
#[derive(Clone, Debug)]
pub struct Queue {
    pub(crate) device: Device,
    pub(crate) context: Context,
}

impl Queue {
    pub fn new(selector: DeviceSelector) -> Result<Self, RuntimeError> {
        let device = selector.select()?;
        Ok(Self::for_device(device))
    }

    /// A queue on `device` using its default context
    pub fn for_device(device: Device) -> Self {
        let context = device.default_context();
        log::debug!("created queue on {device} in context {}", context.id());
        Self { device, context }
    }

    pub fn with_context(context: Context, device: Device) -> Result<Self, RuntimeError> {
        if !context.contains(&device) {
            return Err(RuntimeError::DeviceNotInContext {
                device: device.id(),
                context: context.id(),
            });
        }
        Ok(Self { device, context })
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Copies `bytes` bytes from `src` to `dst`.
    ///
    /// # Safety
    /// Both regions must be valid for `bytes` bytes, either as host memory or as
    /// device memory reachable from this queue's context.
    pub unsafe fn memcpy(&self, dst: *mut u8, src: *const u8, bytes: usize) -> Event {
        log::trace!("queue {}: memcpy {src:p} -> {dst:p} ({bytes} bytes)", self.device.id());
        if bytes != 0 {
            std::ptr::copy(src, dst, bytes);
        }
        Event::complete()
    }

    /// Sets `count` consecutive values starting at `dst` to `value`.
    ///
    /// # Safety
    /// `dst` must be aligned and valid for `count` values of `T`.
    pub unsafe fn fill<T: Pod>(&self, dst: *mut T, value: T, count: usize) -> Event {
        log::trace!(
            "queue {}: fill {dst:p} ({count} x {} bytes)",
            self.device.id(),
            std::mem::size_of::<T>()
        );
        if count != 0 {
            std::slice::from_raw_parts_mut(dst, count).fill(value);
        }
        Event::complete()
    }

    /// Blocks until every submission on this queue has completed.
    pub fn wait(&self) {}
}

impl Default for Queue {
    /// A queue on the configured default device
    fn default() -> Self {
        let selector = default_selector();
        let device = selector.select().unwrap_or_else(|err| {
            log::warn!("{err}, falling back to the host device");
            platform().host_device()
        });
        Self::for_device(device)
    }
}

/// Marks the completion of a queue submission.
#[derive(Debug)]
#[must_use = "a submission is only known to be complete after `Event::wait`"]
pub struct Event {
    _private: (),
}

impl Event {
    fn complete() -> Self {
        Self { _private: () }
    }

    /// Blocks until the submission has completed.
    pub fn wait(self) {}

    pub fn is_complete(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::Queue;
    use crate::{
        context::Context,
        device::{Device, DeviceSelector},
        error::RuntimeError,
        usm,
    };

    #[test]
    fn memcpy_and_fill() {
        let queue = Queue::new(DeviceSelector::Default).unwrap();
        let host = [1u32, 2, 3, 4];
        let mut back = [0u32; 4];

        unsafe {
            let ptr = usm::malloc_device(16, &queue.device(), queue.context()).unwrap();
            queue.memcpy(ptr, host.as_ptr().cast(), 16).wait();
            queue.memcpy(back.as_mut_ptr().cast(), ptr, 16).wait();
            assert_eq!(back, host);

            queue.fill(ptr.cast::<u32>().add(1), 9, 2).wait();
            queue.memcpy(back.as_mut_ptr().cast(), ptr, 16).wait();
            assert_eq!(back, [1, 9, 9, 4]);

            usm::free(ptr, queue.context());
        }
    }

    #[test]
    fn context_must_contain_device() {
        let host = Device::host();
        let other = Context::new(&[]);
        assert_eq!(
            Queue::with_context(other.clone(), host).unwrap_err(),
            RuntimeError::DeviceNotInContext {
                device: host.id(),
                context: other.id(),
            }
        );
        assert!(Queue::with_context(Context::new(&[host]), host).is_ok());
    }

    #[test]
    fn default_queue() {
        let queue = Queue::default();
        assert!(queue.context().contains(&queue.device()));
    }
}
