use std::fmt::Debug;

use bytemuck::Pod;

mod addr;
mod device;
mod host;
mod reference;

pub use addr::DeviceAddr;
pub use device::DevicePtr;
pub use reference::DeviceRef;

mod sealed {
    pub trait Sealed {}
}

/// Whether a handle may be written through. Either [`Mut`] or [`Const`].
pub trait Mutability: sealed::Sealed + 'static {}

/// Marks handles that may be written through
#[derive(Debug)]
pub struct Mut;

/// Marks read-only handles
#[derive(Debug)]
pub struct Const;

impl sealed::Sealed for Mut {}
impl sealed::Sealed for Const {}
impl Mutability for Mut {}
impl Mutability for Const {}

/// A writable element address in some memory location.
///
/// Implemented by [`DevicePtr`] for accelerator memory and by `*mut T` for host
/// memory. Each implementation moves data with the transfer primitive suited to
/// its location, so code generic over `Pointer` is monomorphized into direct
/// calls with no runtime dispatch.
pub trait Pointer: Copy + Eq + Ord + Debug {
    type Elem: Pod;
    /// The read-only form of this pointer
    type Const: Copy + Debug;

    fn null() -> Self;
    fn is_null(self) -> bool;
    fn as_const(self) -> Self::Const;

    /// Moves the address forward by `count` elements. Never touches memory.
    fn advance(self, count: usize) -> Self;

    /// Distance from `origin` to `self`, in elements.
    fn distance_from(self, origin: Self) -> isize;

    /// # Safety
    /// `self` must point to an initialised element of a live allocation.
    unsafe fn read(self) -> Self::Elem;

    /// # Safety
    /// `self` must point into a live allocation.
    unsafe fn write(self, value: Self::Elem);

    /// Copies `src` to the `src.len()` elements starting at `self`.
    ///
    /// # Safety
    /// The destination elements must lie in one live allocation.
    unsafe fn copy_from_host(self, src: &[Self::Elem]);

    /// Copies the `dst.len()` elements starting at `self` into `dst`.
    ///
    /// # Safety
    /// The source elements must lie in one live allocation and be initialised.
    unsafe fn copy_to_host(self, dst: &mut [Self::Elem]);

    /// Copies `count` elements starting at `src` to the same location as `self`.
    ///
    /// # Safety
    /// Both ranges must lie in live allocations and must not overlap.
    unsafe fn copy_from(self, src: Self, count: usize);

    /// Sets the `count` elements starting at `self` to `value`.
    ///
    /// # Safety
    /// The elements must lie in one live allocation.
    unsafe fn fill(self, count: usize, value: Self::Elem);
}
