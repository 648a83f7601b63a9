use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use bytemuck::Pod;

use super::{Const, DeviceAddr, DeviceRef, Mut, Mutability, Pointer};

/// A typed address in accelerator memory.
///
/// Does not own what it points to and is never dereferenced on the host:
/// arithmetic and comparisons only look at the address. Values are read and
/// written through the [`DeviceRef`] returned by [`DevicePtr::target`].
pub struct DevicePtr<T, M: Mutability = Mut> {
    ptr: *mut T,
    _marker: PhantomData<M>,
}

// Handles carry an address only.
unsafe impl<T, M: Mutability> Send for DevicePtr<T, M> {}
unsafe impl<T, M: Mutability> Sync for DevicePtr<T, M> {}

impl<T, M: Mutability> Clone for DevicePtr<T, M> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, M: Mutability> Copy for DevicePtr<T, M> {}

impl<T, M: Mutability> fmt::Debug for DevicePtr<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DevicePtr").field(&self.ptr).finish()
    }
}

impl<T, M: Mutability> Default for DevicePtr<T, M> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T, M: Mutability> DevicePtr<T, M> {
    pub const fn null() -> Self {
        Self::from_raw(std::ptr::null_mut())
    }

    /// Wraps a raw device address.
    ///
    /// Creating handles is safe, it's reading and writing through them that isn't.
    pub const fn from_raw(ptr: *mut T) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    pub fn as_raw(self) -> *mut T {
        self.ptr
    }

    pub fn is_null(self) -> bool {
        self.ptr.is_null()
    }

    pub fn cast<U>(self) -> DevicePtr<U, M> {
        DevicePtr::from_raw(self.ptr.cast())
    }

    pub fn as_const(self) -> DevicePtr<T, Const> {
        DevicePtr::from_raw(self.ptr)
    }

    /// The untyped address
    pub fn addr(self) -> DeviceAddr<M> {
        DeviceAddr::from_raw(self.ptr.cast())
    }

    /// Moves the handle by `count` elements.
    ///
    /// Zero-sized elements are counted in bytes so that ranges of them keep their length.
    pub fn offset(self, count: isize) -> Self {
        if std::mem::size_of::<T>() == 0 {
            Self::from_raw(self.ptr.cast::<u8>().wrapping_offset(count).cast())
        } else {
            Self::from_raw(self.ptr.wrapping_offset(count))
        }
    }

    /// Distance from `origin` to `self`, in elements.
    pub fn offset_from<M2: Mutability>(self, origin: DevicePtr<T, M2>) -> isize {
        let size = std::mem::size_of::<T>().max(1);
        (self.ptr as usize).wrapping_sub(origin.ptr as usize) as isize / size as isize
    }

    /// A proxy to the element this handle points to.
    ///
    /// # Safety
    /// The handle must point to an element of a live device allocation for as long
    /// as the returned reference is used.
    pub unsafe fn target<'a>(self) -> DeviceRef<'a, T, M> {
        DeviceRef::new(self)
    }

    /// A proxy to the element `offset` elements away.
    ///
    /// # Safety
    /// Same as [`DevicePtr::target`], for the offset handle.
    pub unsafe fn at<'a>(self, offset: isize) -> DeviceRef<'a, T, M> {
        self.offset(offset).target()
    }
}

impl<T> From<DevicePtr<T, Mut>> for DevicePtr<T, Const> {
    fn from(ptr: DevicePtr<T, Mut>) -> Self {
        ptr.as_const()
    }
}

impl<T, M: Mutability> From<DevicePtr<T, M>> for DeviceAddr<M> {
    fn from(ptr: DevicePtr<T, M>) -> Self {
        ptr.addr()
    }
}

impl<T> From<DevicePtr<T, Mut>> for DeviceAddr<Const> {
    fn from(ptr: DevicePtr<T, Mut>) -> Self {
        ptr.addr().into()
    }
}

impl<T, M1: Mutability, M2: Mutability> PartialEq<DevicePtr<T, M2>> for DevicePtr<T, M1> {
    fn eq(&self, other: &DevicePtr<T, M2>) -> bool {
        self.ptr == other.ptr
    }
}

impl<T, M: Mutability> Eq for DevicePtr<T, M> {}

impl<T, M1: Mutability, M2: Mutability> PartialOrd<DevicePtr<T, M2>> for DevicePtr<T, M1> {
    fn partial_cmp(&self, other: &DevicePtr<T, M2>) -> Option<Ordering> {
        Some(self.ptr.cmp(&other.ptr))
    }
}

impl<T, M: Mutability> Ord for DevicePtr<T, M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ptr.cmp(&other.ptr)
    }
}

impl<T, M: Mutability> Hash for DevicePtr<T, M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr.hash(state);
    }
}

impl<T, M: Mutability> Add<usize> for DevicePtr<T, M> {
    type Output = Self;

    fn add(self, count: usize) -> Self {
        self.offset(count as isize)
    }
}

impl<T, M: Mutability> Add<DevicePtr<T, M>> for usize {
    type Output = DevicePtr<T, M>;

    fn add(self, ptr: DevicePtr<T, M>) -> DevicePtr<T, M> {
        ptr + self
    }
}

impl<T, M: Mutability> Sub<usize> for DevicePtr<T, M> {
    type Output = Self;

    fn sub(self, count: usize) -> Self {
        self.offset((count as isize).wrapping_neg())
    }
}

impl<T, M1: Mutability, M2: Mutability> Sub<DevicePtr<T, M2>> for DevicePtr<T, M1> {
    type Output = isize;

    fn sub(self, origin: DevicePtr<T, M2>) -> isize {
        self.offset_from(origin)
    }
}

impl<T, M: Mutability> AddAssign<usize> for DevicePtr<T, M> {
    fn add_assign(&mut self, count: usize) {
        *self = *self + count;
    }
}

impl<T, M: Mutability> SubAssign<usize> for DevicePtr<T, M> {
    fn sub_assign(&mut self, count: usize) {
        *self = *self - count;
    }
}

impl<T: Pod> Pointer for DevicePtr<T, Mut> {
    type Elem = T;
    type Const = DevicePtr<T, Const>;

    fn null() -> Self {
        DevicePtr::from_raw(std::ptr::null_mut())
    }

    fn is_null(self) -> bool {
        self.ptr.is_null()
    }

    fn as_const(self) -> Self::Const {
        DevicePtr::from_raw(self.ptr)
    }

    fn advance(self, count: usize) -> Self {
        self + count
    }

    fn distance_from(self, origin: Self) -> isize {
        self - origin
    }

    unsafe fn read(self) -> T {
        self.target().get()
    }

    unsafe fn write(self, value: T) {
        self.target().set(value);
    }

    unsafe fn copy_from_host(self, src: &[T]) {
        crate::copy::copy(src, self);
    }

    unsafe fn copy_to_host(self, dst: &mut [T]) {
        let end = self + dst.len();
        crate::copy::copy(self..end, dst);
    }

    unsafe fn copy_from(self, src: Self, count: usize) {
        crate::copy::copy(src..src + count, self);
    }

    unsafe fn fill(self, count: usize, value: T) {
        crate::fill::fill(self..self + count, value);
    }
}
