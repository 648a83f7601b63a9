use devmem_sys::AllocError;

use crate::ptr::Pointer;

mod device;
mod host;

pub use device::DeviceAllocator;
pub use host::HostAllocator;

/// Allocates buffers of `Value`s in one memory location.
///
/// The [`Pointer`] type an allocator hands out decides where the buffer lives
/// and how data moves in and out of it.
pub trait Allocator: Clone + PartialEq {
    #![allow(clippy::missing_safety_doc)]

    type Value: bytemuck::Pod;
    type Pointer: Pointer<Elem = Self::Value>;

    /// Space for `count` values. `allocate(0)` returns the null pointer.
    fn allocate(&self, count: usize) -> Result<Self::Pointer, AllocError>;

    /// Releases a buffer returned by [`Allocator::allocate`] with the same `count`.
    unsafe fn deallocate(&self, ptr: Self::Pointer, count: usize);
}
