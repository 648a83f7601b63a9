use std::{fmt, marker::PhantomData, mem::size_of, ptr::NonNull};

use bytemuck::Pod;
use devmem_sys::{usm, AllocError, Context, Device, Queue};

use super::Allocator;
use crate::ptr::DevicePtr;

/// Allocates device memory for one device in one context.
///
/// With `ALIGN == 0` buffers get the runtime's default alignment, otherwise
/// they are aligned to `ALIGN` bytes.
pub struct DeviceAllocator<T, const ALIGN: usize = 0> {
    device: Device,
    context: Context,
    _marker: PhantomData<fn() -> T>,
}

impl<T, const ALIGN: usize> DeviceAllocator<T, ALIGN> {
    /// Allocates on the device and in the context of `queue`
    pub fn new(queue: &Queue) -> Self {
        Self {
            device: queue.device(),
            context: queue.context().clone(),
            _marker: PhantomData,
        }
    }

    pub fn with_context(context: Context, device: Device) -> Self {
        Self {
            device,
            context,
            _marker: PhantomData,
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The same allocator, for values of type `U`
    pub fn rebind<U>(&self) -> DeviceAllocator<U, ALIGN> {
        DeviceAllocator::with_context(self.context.clone(), self.device)
    }
}

impl<T, const ALIGN: usize> Default for DeviceAllocator<T, ALIGN> {
    /// Allocates on the configured default device
    fn default() -> Self {
        Self::new(&Queue::default())
    }
}

impl<T, const ALIGN: usize> Clone for DeviceAllocator<T, ALIGN> {
    fn clone(&self) -> Self {
        Self::with_context(self.context.clone(), self.device)
    }
}

impl<T, const ALIGN: usize> fmt::Debug for DeviceAllocator<T, ALIGN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceAllocator")
            .field("device", &self.device)
            .field("context", &self.context.id())
            .field("align", &ALIGN)
            .finish()
    }
}

impl<T, U, const A1: usize, const A2: usize> PartialEq<DeviceAllocator<U, A2>>
    for DeviceAllocator<T, A1>
{
    fn eq(&self, other: &DeviceAllocator<U, A2>) -> bool {
        self.device == other.device && self.context == other.context
    }
}

impl<T, const ALIGN: usize> Eq for DeviceAllocator<T, ALIGN> {}

impl<T: Pod, const ALIGN: usize> Allocator for DeviceAllocator<T, ALIGN> {
    type Value = T;
    type Pointer = DevicePtr<T>;

    fn allocate(&self, count: usize) -> Result<DevicePtr<T>, AllocError> {
        if count == 0 {
            return Ok(DevicePtr::null());
        }
        if size_of::<T>() == 0 {
            // never transferred, so it only has to be distinct from null
            return Ok(DevicePtr::from_raw(NonNull::dangling().as_ptr()));
        }
        let bytes = count
            .checked_mul(size_of::<T>())
            .ok_or(AllocError::SizeOverflow)?;

        let ptr = if ALIGN == 0 {
            usm::malloc_device(bytes, &self.device, &self.context)?
        } else {
            usm::aligned_alloc_device(ALIGN, bytes, &self.device, &self.context)?
        };
        Ok(DevicePtr::from_raw(ptr.cast()))
    }

    unsafe fn deallocate(&self, ptr: DevicePtr<T>, _count: usize) {
        if size_of::<T>() == 0 {
            return;
        }
        usm::free(ptr.as_raw().cast(), &self.context);
    }
}

#[cfg(test)]
mod tests {
    use devmem_sys::{usm, AllocError, Context, Device, Queue};

    use super::DeviceAllocator;
    use crate::allocator::Allocator;

    #[test]
    fn equality() {
        let queue = Queue::for_device(Device::host());
        let a = DeviceAllocator::<u32>::new(&queue);

        assert_eq!(a, a.clone());
        assert_eq!(a, a.rebind::<f64>());
        assert_eq!(a.rebind::<f64>().device(), a.device());
        assert_eq!(a, DeviceAllocator::<u32>::new(&queue.clone()));

        let context = Context::new(&[queue.device()]);
        let other = DeviceAllocator::<u32>::with_context(context, queue.device());
        assert_ne!(a, other);
    }

    #[test]
    fn empty_allocation() {
        let a = DeviceAllocator::<u32>::default();
        let ptr = a.allocate(0).unwrap();
        assert!(ptr.is_null());
        unsafe { a.deallocate(ptr, 0) };
    }

    #[test]
    fn alignment() {
        let a = DeviceAllocator::<u8, 4096>::default();
        let ptr = a.allocate(3).unwrap();
        assert_eq!(ptr.as_raw() as usize % 4096, 0);
        unsafe { a.deallocate(ptr, 3) };

        let a = DeviceAllocator::<u8, 3>::default();
        assert_eq!(a.allocate(3), Err(AllocError::InvalidAlignment { align: 3 }));
    }

    #[test]
    fn failures() {
        let a = DeviceAllocator::<u64>::new(&Queue::for_device(Device::host()));
        assert_eq!(a.allocate(usize::MAX / 4), Err(AllocError::SizeOverflow));

        let count = a.device().global_mem_size() / 8 + 1;
        assert!(matches!(a.allocate(count), Err(AllocError::OutOfMemory { .. })));
    }

    #[test]
    fn zero_sized() {
        let a = DeviceAllocator::<()>::default();
        let ptr = a.allocate(5).unwrap();
        assert!(!ptr.is_null());
        // no device memory backs it
        assert!(usm::pointer_info(ptr.as_raw().cast()).is_none());
        unsafe { a.deallocate(ptr, 5) };
    }
}
