use std::{
    fmt,
    ops::{Deref, DerefMut, Range},
};

use bytemuck::Pod;

use crate::{
    allocator::{Allocator, DeviceAllocator, HostAllocator},
    error::{Error, Result},
    ptr::{Const, DeviceRef, Mut, Pointer},
};

/// A growable buffer of `T`s in the memory location of its allocator.
///
/// Same as [`std::vec::Vec`], but the elements may live in accelerator memory.
/// Element access from the host goes through single element transfers, so
/// prefer the bulk operations ([`Vector::assign`], [`Vector::to_host`],
/// [`crate::copy`]) for anything larger than a handful of values.
pub struct Vector<T: Pod, A: Allocator<Value = T> = DeviceAllocator<T>> {
    ptr: A::Pointer,
    len: usize,
    cap: usize,
    alloc: A,
}

/// A vector in accelerator memory. Buffers are aligned to `ALIGN` bytes when it is non-zero.
pub type DeviceVector<T, const ALIGN: usize = 0> = Vector<T, DeviceAllocator<T, ALIGN>>;

/// A vector in host memory
pub type HostVector<T> = Vector<T, HostAllocator<T>>;

// The buffer is owned exclusively, like Vec's.
unsafe impl<T: Pod + Send, A: Allocator<Value = T> + Send> Send for Vector<T, A> {}
unsafe impl<T: Pod + Sync, A: Allocator<Value = T> + Sync> Sync for Vector<T, A> {}

impl<T: Pod, A: Allocator<Value = T>> Drop for Vector<T, A> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { self.alloc.deallocate(self.ptr, self.cap) }
        }
    }
}

impl<T: Pod, A: Allocator<Value = T>> Vector<T, A> {
    pub fn new_in(alloc: A) -> Self {
        Self {
            ptr: A::Pointer::null(),
            len: 0,
            cap: 0,
            alloc,
        }
    }

    pub fn new() -> Self
    where
        A: Default,
    {
        Self::new_in(A::default())
    }

    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        let mut vec = Self::new_in(alloc);
        vec.reserve(capacity)?;
        Ok(vec)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self>
    where
        A: Default,
    {
        Self::with_capacity_in(capacity, A::default())
    }

    /// `count` copies of `value`
    pub fn from_elem_in(count: usize, value: T, alloc: A) -> Result<Self> {
        let mut vec = Self::with_capacity_in(count, alloc)?;
        unsafe {
            vec.ptr.fill(count, value);
            vec.set_len(count);
        }
        Ok(vec)
    }

    pub fn from_elem(count: usize, value: T) -> Result<Self>
    where
        A: Default,
    {
        Self::from_elem_in(count, value, A::default())
    }

    pub fn zeroed_in(count: usize, alloc: A) -> Result<Self> {
        Self::from_elem_in(count, T::zeroed(), alloc)
    }

    pub fn zeroed(count: usize) -> Result<Self>
    where
        A: Default,
    {
        Self::zeroed_in(count, A::default())
    }

    /// Copies `slice` into a new buffer in the allocator's location
    pub fn from_host_in(slice: &[T], alloc: A) -> Result<Self> {
        let mut vec = Self::with_capacity_in(slice.len(), alloc)?;
        unsafe {
            vec.ptr.copy_from_host(slice);
            vec.set_len(slice.len());
        }
        Ok(vec)
    }

    pub fn from_host(slice: &[T]) -> Result<Self>
    where
        A: Default,
    {
        Self::from_host_in(slice, A::default())
    }

    /// Copies the elements in `range`, which is in the allocator's location,
    /// into a new buffer.
    ///
    /// # Safety
    /// The range must lie in one live allocation and be initialised.
    ///
    /// # Panics
    /// If the range ends before it starts.
    pub unsafe fn from_device_range_in(range: Range<A::Pointer>, alloc: A) -> Result<Self> {
        let count = range.end.distance_from(range.start);
        assert!(count >= 0, "range ends before it starts");
        let count = count as usize;

        let mut vec = Self::with_capacity_in(count, alloc)?;
        if count != 0 {
            vec.ptr.copy_from(range.start, count);
        }
        vec.set_len(count);
        Ok(vec)
    }

    /// A copy of this vector in a new buffer allocated by `alloc`.
    ///
    /// The new capacity equals the length, headroom isn't carried over.
    pub fn try_clone_in(&self, alloc: A) -> Result<Self> {
        let mut vec = Self::with_capacity_in(self.len, alloc)?;
        unsafe {
            if self.len != 0 {
                vec.ptr.copy_from(self.ptr, self.len);
            }
            vec.set_len(self.len);
        }
        Ok(vec)
    }

    pub fn try_clone(&self) -> Result<Self> {
        self.try_clone_in(self.alloc.clone())
    }

    /// Moves the buffer out, leaving an empty vector with the same allocator.
    pub fn take(&mut self) -> Self {
        let empty = Self::new_in(self.alloc.clone());
        std::mem::replace(self, empty)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// # Safety
    /// Elements in `[0, len)` must be initialised and `len` at most the capacity.
    pub unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.cap);
        self.len = len;
    }

    /// Pointer to the first element. Null when nothing was allocated yet.
    pub fn as_ptr(&self) -> <A::Pointer as Pointer>::Const {
        self.ptr.as_const()
    }

    pub fn as_mut_ptr(&mut self) -> A::Pointer {
        self.ptr
    }

    /// Pointer to the first element
    pub fn begin(&mut self) -> A::Pointer {
        self.ptr
    }

    /// Pointer one past the last element
    pub fn end(&mut self) -> A::Pointer {
        self.ptr.advance(self.len)
    }

    pub fn cbegin(&self) -> <A::Pointer as Pointer>::Const {
        self.as_ptr()
    }

    pub fn cend(&self) -> <A::Pointer as Pointer>::Const {
        self.ptr.advance(self.len).as_const()
    }

    /// Makes room for at least `capacity` elements in total.
    ///
    /// Does nothing if the capacity is already large enough, otherwise moves the
    /// elements into a buffer of exactly `capacity` elements.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.cap {
            return Ok(());
        }
        self.reallocate(capacity, self.len)
    }

    /// Moves the first `keep` elements into a new buffer of `capacity` elements.
    ///
    /// On failure the vector is left untouched.
    fn reallocate(&mut self, capacity: usize, keep: usize) -> Result<()> {
        log::trace!("reallocating vector: {} -> {capacity} elements", self.cap);

        let ptr = self.alloc.allocate(capacity)?;
        unsafe {
            if keep != 0 {
                ptr.copy_from(self.ptr, keep);
            }
            if !self.ptr.is_null() {
                self.alloc.deallocate(self.ptr, self.cap);
            }
        }
        self.ptr = ptr;
        self.cap = capacity;
        Ok(())
    }

    /// Appends `value`, growing the capacity to the next power of two if it's full.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        if self.len == self.cap {
            let capacity = self
                .cap
                .checked_add(1)
                .and_then(usize::checked_next_power_of_two)
                .ok_or(Error::CapacityOverflow)?;
            self.reserve(capacity)?;
        }
        unsafe { self.ptr.advance(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Appends `value` only if that needs no reallocation.
    pub fn try_push_back(&mut self, value: T) -> bool {
        if self.len == self.cap {
            return false;
        }
        unsafe { self.ptr.advance(self.len).write(value) };
        self.len += 1;
        true
    }

    /// Sets the length to `len`, filling new elements with `value`.
    ///
    /// Never shrinks the capacity.
    pub fn resize(&mut self, len: usize, value: T) -> Result<()> {
        if len > self.len {
            self.reserve(len)?;
            unsafe { self.ptr.advance(self.len).fill(len - self.len, value) };
        }
        self.len = len;
        Ok(())
    }

    pub fn resize_zeroed(&mut self, len: usize) -> Result<()> {
        self.resize(len, T::zeroed())
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Replaces the contents with a copy of `slice`.
    pub fn assign(&mut self, slice: &[T]) -> Result<()> {
        if slice.len() > self.cap {
            // nothing needs to survive the reallocation
            self.reallocate(slice.len(), 0)?;
        }
        unsafe {
            self.ptr.copy_from_host(slice);
            self.set_len(slice.len());
        }
        Ok(())
    }

    /// Replaces the contents with a copy of `other`.
    pub fn assign_from(&mut self, other: &Self) -> Result<()> {
        if other.len > self.cap {
            self.reallocate(other.len, 0)?;
        }
        unsafe {
            if other.len != 0 {
                self.ptr.copy_from(other.ptr, other.len);
            }
            self.set_len(other.len);
        }
        Ok(())
    }

    /// Reads the element at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn get(&self, index: usize) -> T {
        self.check_index(index);
        unsafe { self.ptr.advance(index).read() }
    }

    /// Overwrites the element at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: T) {
        self.check_index(index);
        unsafe { self.ptr.advance(index).write(value) }
    }

    /// Copies every element into the start of `dst`.
    ///
    /// # Panics
    /// If `dst` is shorter than the vector.
    pub fn copy_to_host(&self, dst: &mut [T]) {
        assert!(
            self.len <= dst.len(),
            "copying {} elements into a slice of length {}",
            self.len,
            dst.len()
        );
        unsafe { self.ptr.copy_to_host(&mut dst[..self.len]) }
    }

    /// Copies the elements into a new host vector.
    pub fn to_host(&self) -> Vec<T> {
        let mut out = vec![T::zeroed(); self.len];
        self.copy_to_host(&mut out);
        out
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.len,
            "index out of bounds: the len is {} but the index is {index}",
            self.len
        );
    }
}

impl<T: Pod, const ALIGN: usize> Vector<T, DeviceAllocator<T, ALIGN>> {
    /// A read-only proxy to the element at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn at(&self, index: usize) -> DeviceRef<'_, T, Const> {
        self.check_index(index);
        unsafe { (self.ptr + index).as_const().target() }
    }

    /// A proxy to the element at `index` that can be written through.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn at_mut(&mut self, index: usize) -> DeviceRef<'_, T, Mut> {
        self.check_index(index);
        unsafe { (self.ptr + index).target() }
    }
}

impl<T: Pod> Vector<T, HostAllocator<T>> {
    pub fn as_slice(&self) -> &[T] {
        if self.len == 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.len == 0 {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }
}

impl<T: Pod> Deref for Vector<T, HostAllocator<T>> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Pod> DerefMut for Vector<T, HostAllocator<T>> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Pod, A: Allocator<Value = T> + Default> Default for Vector<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod + fmt::Debug, A: Allocator<Value = T>> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_host()).finish()
    }
}

impl<T: Pod, A: Allocator<Value = T> + Default> TryFrom<&[T]> for Vector<T, A> {
    type Error = Error;

    fn try_from(slice: &[T]) -> Result<Self> {
        Self::from_host(slice)
    }
}

impl<T: Pod, A: Allocator<Value = T> + Default> TryFrom<Vec<T>> for Vector<T, A> {
    type Error = Error;

    fn try_from(vec: Vec<T>) -> Result<Self> {
        Self::from_host(&vec)
    }
}
