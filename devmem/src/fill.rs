use std::ops::Range;

use bytemuck::Pod;
use devmem_sys::Queue;

use crate::{
    copy::range_len,
    policy::Policy,
    ptr::{DevicePtr, Mut},
    resolver::queue_of,
};

/// A destination range whose elements can all be set to one `T`.
pub trait FillRange<T> {
    #![allow(clippy::missing_safety_doc)]

    unsafe fn fill_on(self, queue: &Queue, value: T);

    /// Fills on the queue owning the range.
    unsafe fn fill_resolved(self, value: T);
}

/// Sets every element of `range` to `value`.
///
/// # Safety
/// Device ranges must lie in one live allocation.
pub unsafe fn fill<R, T>(range: R, value: T)
where
    R: FillRange<T>,
{
    range.fill_resolved(value);
}

/// Same as [`fill`], on the queue of `policy`.
///
/// # Safety
/// See [`fill`]. The range must also be reachable from the policy's context.
pub unsafe fn fill_with<P, R, T>(policy: &P, range: R, value: T)
where
    P: Policy + ?Sized,
    R: FillRange<T>,
{
    range.fill_on(policy.queue(), value);
}

impl<T: Pod> FillRange<T> for Range<DevicePtr<T, Mut>> {
    unsafe fn fill_on(self, queue: &Queue, value: T) {
        let count = range_len(&self);
        if count == 0 {
            return;
        }
        queue.fill(self.start.as_raw(), value, count).wait();
    }

    unsafe fn fill_resolved(self, value: T) {
        if range_len(&self) == 0 {
            return;
        }
        let queue = queue_of(self.start);
        self.fill_on(&queue, value);
    }
}

impl<'a, T: Pod> FillRange<T> for &'a mut [T] {
    unsafe fn fill_on(self, _queue: &Queue, value: T) {
        self.fill(value);
    }

    unsafe fn fill_resolved(self, value: T) {
        self.fill(value);
    }
}
