use devmem_sys::{pointer_info, Queue};

use crate::ptr::{DevicePtr, Mutability};

/// The queue whose context owns the allocation containing `ptr`.
///
/// # Panics
/// If `ptr` was not allocated by the device runtime, or its allocation was freed.
pub fn pointer_queue(ptr: *const u8) -> Queue {
    match pointer_info(ptr) {
        Some(info) => info.queue(),
        None => panic!("{ptr:p} is not in a live device allocation"),
    }
}

/// The queue owning the allocation `ptr` points into. See [`pointer_queue`].
pub fn queue_of<T, M: Mutability>(ptr: DevicePtr<T, M>) -> Queue {
    pointer_queue(ptr.as_raw() as *const u8)
}
