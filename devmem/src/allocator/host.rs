use std::{alloc::Layout, fmt, marker::PhantomData, ptr::NonNull};

use bytemuck::Pod;
use devmem_sys::AllocError;

use super::Allocator;

/// Allocates ordinary host memory from the global allocator.
pub struct HostAllocator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> HostAllocator<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for HostAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HostAllocator<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for HostAllocator<T> {}

impl<T> fmt::Debug for HostAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostAllocator")
    }
}

impl<T, U> PartialEq<HostAllocator<U>> for HostAllocator<T> {
    fn eq(&self, _: &HostAllocator<U>) -> bool {
        true
    }
}

impl<T> Eq for HostAllocator<T> {}

impl<T: Pod> Allocator for HostAllocator<T> {
    type Value = T;
    type Pointer = *mut T;

    fn allocate(&self, count: usize) -> Result<*mut T, AllocError> {
        let layout = Layout::array::<T>(count).map_err(|_| AllocError::SizeOverflow)?;
        if count == 0 {
            return Ok(std::ptr::null_mut());
        }
        if layout.size() == 0 {
            // zero-sized elements need no memory, only a non-null aligned address
            return Ok(NonNull::dangling().as_ptr());
        }

        // Safety: layout has a non-zero size
        let ptr = unsafe { std::alloc::alloc(layout) };
        if ptr.is_null() {
            return Err(AllocError::Exhausted {
                requested: layout.size(),
            });
        }
        Ok(ptr.cast())
    }

    unsafe fn deallocate(&self, ptr: *mut T, count: usize) {
        if ptr.is_null() || std::mem::size_of::<T>() == 0 {
            return;
        }
        // the layout was valid when the buffer was allocated
        let layout = Layout::array::<T>(count).unwrap_unchecked();
        std::alloc::dealloc(ptr.cast(), layout);
    }
}

#[cfg(test)]
mod tests {
    use devmem_sys::AllocError;

    use super::HostAllocator;
    use crate::allocator::Allocator;

    #[test]
    fn allocate() {
        let a = HostAllocator::<u32>::new();
        assert_eq!(a, HostAllocator::<u8>::default());

        assert!(a.allocate(0).unwrap().is_null());
        assert_eq!(a.allocate(usize::MAX), Err(AllocError::SizeOverflow));

        let ptr = a.allocate(10).unwrap();
        assert_eq!(ptr as usize % std::mem::align_of::<u32>(), 0);
        unsafe {
            for i in 0..10 {
                ptr.add(i).write(i as u32);
            }
            assert_eq!(std::slice::from_raw_parts(ptr, 10)[9], 9);
            a.deallocate(ptr, 10);
        }
    }

    #[test]
    fn zero_sized() {
        let a = HostAllocator::<()>::new();
        assert!(a.allocate(0).unwrap().is_null());

        let ptr = a.allocate(5).unwrap();
        assert!(!ptr.is_null());
        unsafe { a.deallocate(ptr, 5) };
    }
}
