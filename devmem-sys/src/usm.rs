use std::{
    alloc::Layout,
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{context::Context, device::Device, error::AllocError, queue::Queue};

/// Alignment of every allocation made without an explicit alignment.
pub const DEFAULT_ALIGNMENT: usize = 256;

struct Allocation {
    layout: Layout,
    device: Device,
    context: Context,
}

struct Registry {
    /// live allocations, keyed by base address
    allocations: BTreeMap<usize, Allocation>,
    /// bytes in use, keyed by device id
    in_use: BTreeMap<u32, usize>,
}

static REGISTRY: Mutex<Registry> = Mutex::new(Registry {
    allocations: BTreeMap::new(),
    in_use: BTreeMap::new(),
});

fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Where a device address was allocated.
#[derive(Clone, Debug)]
pub struct PointerInfo {
    /// start of the allocation containing the address
    pub base: usize,
    /// size of that allocation, in bytes
    pub len: usize,
    pub device: Device,
    pub context: Context,
}

impl PointerInfo {
    /// A queue that can operate on the allocation
    pub fn queue(&self) -> Queue {
        Queue {
            device: self.device,
            context: self.context.clone(),
        }
    }
}

/// Allocates `bytes` bytes of device memory with [`DEFAULT_ALIGNMENT`].
///
/// Zero-sized requests return a null pointer.
pub fn malloc_device(
    bytes: usize,
    device: &Device,
    context: &Context,
) -> Result<*mut u8, AllocError> {
    aligned_alloc_device(DEFAULT_ALIGNMENT, bytes, device, context)
}

/// Allocates `bytes` bytes of device memory aligned to at least `align` bytes.
///
/// Zero-sized requests return a null pointer.
pub fn aligned_alloc_device(
    align: usize,
    bytes: usize,
    device: &Device,
    context: &Context,
) -> Result<*mut u8, AllocError> {
    if !align.is_power_of_two() {
        return Err(AllocError::InvalidAlignment { align });
    }
    if !context.contains(device) {
        return Err(AllocError::DeviceNotInContext {
            device: device.id(),
            context: context.id(),
        });
    }
    if bytes == 0 {
        return Ok(std::ptr::null_mut());
    }

    let layout = Layout::from_size_align(bytes, align.max(DEFAULT_ALIGNMENT))
        .map_err(|_| AllocError::SizeOverflow)?;

    let mut registry = registry();
    let in_use = registry.in_use.entry(device.id()).or_default();
    let available = device.global_mem_size().saturating_sub(*in_use);
    if bytes > available {
        return Err(AllocError::OutOfMemory {
            requested: bytes,
            available,
            device: device.id(),
        });
    }

    // Safety: layout has a non-zero size
    let ptr = unsafe { std::alloc::alloc(layout) };
    if ptr.is_null() {
        return Err(AllocError::Exhausted { requested: bytes });
    }
    *in_use += bytes;

    registry.allocations.insert(
        ptr as usize,
        Allocation {
            layout,
            device: *device,
            context: context.clone(),
        },
    );
    log::debug!(
        "allocated {bytes} bytes at {ptr:p} on device {} (context {})",
        device.id(),
        context.id()
    );

    Ok(ptr)
}

/// Releases an allocation made by [`malloc_device`] or [`aligned_alloc_device`].
///
/// Null pointers are ignored. Unknown pointers are reported and ignored.
///
/// # Safety
/// No handle to the allocation may be used afterwards.
pub unsafe fn free(ptr: *mut u8, context: &Context) {
    if ptr.is_null() {
        return;
    }

    let mut registry = registry();
    let Some(allocation) = registry.allocations.remove(&(ptr as usize)) else {
        log::warn!("free of {ptr:p}, which is not a live device allocation");
        return;
    };
    if allocation.context != *context {
        log::warn!(
            "{ptr:p} was allocated in context {} but freed through context {}",
            allocation.context.id(),
            context.id()
        );
    }
    if let Some(in_use) = registry.in_use.get_mut(&allocation.device.id()) {
        *in_use -= allocation.layout.size();
    }
    drop(registry);

    std::alloc::dealloc(ptr, allocation.layout);
    log::debug!("freed {} bytes at {ptr:p}", allocation.layout.size());
}

/// Looks up the allocation containing `ptr`.
///
/// Any address inside a live allocation resolves, as does the address one past
/// its end.
pub fn pointer_info(ptr: *const u8) -> Option<PointerInfo> {
    let addr = ptr as usize;
    let registry = registry();
    let (&base, allocation) = registry.allocations.range(..=addr).next_back()?;
    let len = allocation.layout.size();

    (addr - base <= len).then(|| PointerInfo {
        base,
        len,
        device: allocation.device,
        context: allocation.context.clone(),
    })
}

/// Bytes currently allocated on `device`
pub fn device_memory_in_use(device: &Device) -> usize {
    registry()
        .in_use
        .get(&device.id())
        .copied()
        .unwrap_or_default()
}
