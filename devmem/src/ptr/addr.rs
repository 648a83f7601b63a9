use std::{fmt, hash::Hash, marker::PhantomData};

use super::{Const, DevicePtr, Mut, Mutability};

/// An untyped address in accelerator memory.
///
/// Typed handles widen into this implicitly, `Mut` addresses widen into `Const` ones.
pub struct DeviceAddr<M: Mutability = Mut> {
    addr: *mut u8,
    _marker: PhantomData<M>,
}

unsafe impl<M: Mutability> Send for DeviceAddr<M> {}
unsafe impl<M: Mutability> Sync for DeviceAddr<M> {}

impl<M: Mutability> Clone for DeviceAddr<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Mutability> Copy for DeviceAddr<M> {}

impl<M: Mutability> fmt::Debug for DeviceAddr<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeviceAddr").field(&self.addr).finish()
    }
}

impl<M: Mutability> PartialEq for DeviceAddr<M> {
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr
    }
}

impl<M: Mutability> Eq for DeviceAddr<M> {}

impl<M: Mutability> PartialOrd for DeviceAddr<M> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<M: Mutability> Ord for DeviceAddr<M> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.addr.cmp(&other.addr)
    }
}

impl<M: Mutability> Hash for DeviceAddr<M> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.addr.hash(state);
    }
}

impl<M: Mutability> Default for DeviceAddr<M> {
    fn default() -> Self {
        Self::null()
    }
}

impl<M: Mutability> DeviceAddr<M> {
    pub const fn null() -> Self {
        Self::from_raw(std::ptr::null_mut())
    }

    pub const fn from_raw(addr: *mut u8) -> Self {
        Self {
            addr,
            _marker: PhantomData,
        }
    }

    pub fn as_raw(self) -> *mut u8 {
        self.addr
    }

    pub fn is_null(self) -> bool {
        self.addr.is_null()
    }

    /// Reinterprets the address as a handle to `T`.
    pub fn cast<T>(self) -> DevicePtr<T, M> {
        DevicePtr::from_raw(self.addr.cast())
    }
}

impl From<DeviceAddr<Mut>> for DeviceAddr<Const> {
    fn from(addr: DeviceAddr<Mut>) -> Self {
        Self::from_raw(addr.addr)
    }
}

#[cfg(test)]
mod tests {
    use super::DeviceAddr;
    use crate::ptr::{Const, Mut};

    #[test]
    fn widen() {
        let a = DeviceAddr::<Mut>::from_raw(0x40 as *mut u8);
        let c: DeviceAddr<Const> = a.into();
        assert_eq!(c.as_raw(), a.as_raw());
        assert!(DeviceAddr::<Const>::default().is_null());
        assert!(c > DeviceAddr::null());
    }
}
