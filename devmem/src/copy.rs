use std::{mem::size_of, ops::Range};

use bytemuck::Pod;
use devmem_sys::Queue;

use crate::{
    policy::Policy,
    ptr::{DevicePtr, Mut, Mutability},
    resolver::queue_of,
};

/// A source range that can be copied to a `Dst`.
///
/// Implemented for each supported (source, destination) pair of locations:
///
/// | source                   | destination          | queue                |
/// |--------------------------|----------------------|----------------------|
/// | `&[T]`                   | `DevicePtr<T>`       | the destination's    |
/// | `Range<DevicePtr<T, M>>` | `&mut [T]`           | the source's         |
/// | `Range<DevicePtr<T, M>>` | `DevicePtr<T>`       | the source's         |
/// | `&[T]`                   | `&mut [T]`           | none                 |
///
/// Slice destinations receive the range in their first `count()` elements.
pub trait CopyRange<Dst> {
    #![allow(clippy::missing_safety_doc)]

    /// Number of elements in the range
    fn count(&self) -> usize;

    /// Copies the range to `d_first` on `queue`, blocking until it completes.
    unsafe fn copy_on(self, queue: &Queue, d_first: Dst);

    /// Copies the range to `d_first` on the queue owning the device side.
    unsafe fn copy_resolved(self, d_first: Dst);
}

/// Copies `range` to the elements starting at `d_first`.
///
/// The queue is looked up from whichever side of the transfer is in device
/// memory. Empty ranges transfer nothing and look nothing up.
///
/// # Safety
/// Device handles must address live allocations covering the whole transfer,
/// and the source elements must be initialised.
///
/// # Panics
/// If a slice destination is shorter than the range, or a device range ends
/// before it starts.
pub unsafe fn copy<R, D>(range: R, d_first: D)
where
    R: CopyRange<D>,
{
    range.copy_resolved(d_first);
}

/// Same as [`copy`], but submits to the queue of `policy` instead of looking it up.
///
/// # Safety
/// See [`copy`]. The device side must also be reachable from the policy's context.
pub unsafe fn copy_with<P, R, D>(policy: &P, range: R, d_first: D)
where
    P: Policy + ?Sized,
    R: CopyRange<D>,
{
    range.copy_on(policy.queue(), d_first);
}

/// Number of elements in `first..last`
pub(crate) fn range_len<T, M: Mutability>(range: &Range<DevicePtr<T, M>>) -> usize {
    if size_of::<T>() == 0 {
        return 0;
    }
    let len = range.end - range.start;
    assert!(len >= 0, "device range ends before it starts");
    len as usize
}

unsafe fn memcpy<T>(queue: &Queue, dst: *mut T, src: *const T, count: usize) {
    queue
        .memcpy(dst.cast(), src.cast(), count * size_of::<T>())
        .wait();
}

impl<'a, T: Pod> CopyRange<DevicePtr<T, Mut>> for &'a [T] {
    fn count(&self) -> usize {
        self.len()
    }

    unsafe fn copy_on(self, queue: &Queue, d_first: DevicePtr<T, Mut>) {
        if self.is_empty() {
            return;
        }
        memcpy(queue, d_first.as_raw(), self.as_ptr(), self.len());
    }

    unsafe fn copy_resolved(self, d_first: DevicePtr<T, Mut>) {
        if self.is_empty() || size_of::<T>() == 0 {
            return;
        }
        self.copy_on(&queue_of(d_first), d_first);
    }
}

impl<'a, T: Pod, M: Mutability> CopyRange<&'a mut [T]> for Range<DevicePtr<T, M>> {
    fn count(&self) -> usize {
        range_len(self)
    }

    unsafe fn copy_on(self, queue: &Queue, d_first: &'a mut [T]) {
        let count = range_len(&self);
        assert!(
            count <= d_first.len(),
            "copying {count} elements into a slice of length {}",
            d_first.len()
        );
        if count == 0 {
            return;
        }
        memcpy(queue, d_first.as_mut_ptr(), self.start.as_raw(), count);
    }

    unsafe fn copy_resolved(self, d_first: &'a mut [T]) {
        if range_len(&self) == 0 {
            return;
        }
        let queue = queue_of(self.start);
        self.copy_on(&queue, d_first);
    }
}

impl<T: Pod, M: Mutability> CopyRange<DevicePtr<T, Mut>> for Range<DevicePtr<T, M>> {
    fn count(&self) -> usize {
        range_len(self)
    }

    unsafe fn copy_on(self, queue: &Queue, d_first: DevicePtr<T, Mut>) {
        let count = range_len(&self);
        if count == 0 {
            return;
        }
        memcpy(queue, d_first.as_raw(), self.start.as_raw(), count);
    }

    unsafe fn copy_resolved(self, d_first: DevicePtr<T, Mut>) {
        if range_len(&self) == 0 {
            return;
        }
        let queue = queue_of(self.start);
        self.copy_on(&queue, d_first);
    }
}

impl<'a, 'b, T: Pod> CopyRange<&'b mut [T]> for &'a [T] {
    fn count(&self) -> usize {
        self.len()
    }

    unsafe fn copy_on(self, _queue: &Queue, d_first: &'b mut [T]) {
        self.copy_resolved(d_first);
    }

    unsafe fn copy_resolved(self, d_first: &'b mut [T]) {
        assert!(
            self.len() <= d_first.len(),
            "copying {} elements into a slice of length {}",
            self.len(),
            d_first.len()
        );
        d_first[..self.len()].copy_from_slice(self);
    }
}
