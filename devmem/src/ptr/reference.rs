use std::{fmt, marker::PhantomData};

use bytemuck::Pod;

use super::{DevicePtr, Mut, Mutability};
use crate::resolver::queue_of;

/// A proxy standing in for `&T` / `&mut T` to a value in accelerator memory.
///
/// The host can't dereference device addresses, so every read and every write
/// is a complete transfer on the queue owning the address. Only created by
/// dereferencing a [`DevicePtr`] or by indexing a device vector.
pub struct DeviceRef<'a, T, M: Mutability = Mut> {
    ptr: DevicePtr<T, M>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, M: Mutability> DeviceRef<'a, T, M> {
    /// # Safety
    /// `ptr` must point to an element of a live device allocation for `'a`.
    pub(crate) unsafe fn new(ptr: DevicePtr<T, M>) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    /// The address this reference is bound to
    pub fn ptr(&self) -> DevicePtr<T, M> {
        self.ptr
    }
}

impl<'a, T: Pod, M: Mutability> DeviceRef<'a, T, M> {
    /// Copies the referenced value to the host.
    pub fn get(&self) -> T {
        let mut value = T::zeroed();
        let bytes = std::mem::size_of::<T>();
        if bytes != 0 {
            let queue = queue_of(self.ptr);
            // Safety: the address is live for 'a and `value` is a host local
            unsafe {
                queue
                    .memcpy((&mut value as *mut T).cast(), self.ptr.as_raw().cast(), bytes)
                    .wait();
            }
        }
        value
    }
}

impl<'a, T: Pod> DeviceRef<'a, T, Mut> {
    /// Copies `value` into the referenced location.
    pub fn set(&self, value: T) {
        let bytes = std::mem::size_of::<T>();
        if bytes != 0 {
            let queue = queue_of(self.ptr);
            // Safety: the address is live for 'a
            unsafe {
                queue
                    .memcpy(self.ptr.as_raw().cast(), (&value as *const T).cast(), bytes)
                    .wait();
            }
        }
    }

    /// Copies the value behind `other` into the referenced location.
    ///
    /// The value passes through the host.
    pub fn assign<M2: Mutability>(&self, other: &DeviceRef<'_, T, M2>) {
        self.set(other.get());
    }
}

impl<'a, T: Pod + fmt::Debug, M: Mutability> fmt::Debug for DeviceRef<'a, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceRef")
            .field("ptr", &self.ptr)
            .field("value", &self.get())
            .finish()
    }
}
