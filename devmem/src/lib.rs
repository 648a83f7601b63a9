//! Containers, pointers and algorithms over accelerator memory.
//!
//! Where a buffer lives is part of its type. [`DevicePtr`] addresses accelerator
//! memory and `*mut T` addresses host memory; both implement [`Pointer`], and
//! the allocator of a [`Vector`] picks which one it stores. Transfers are routed
//! by those types at compile time, never by a runtime flag.
//!
//! ```no_run
//! use devmem::{copy, fill, DeviceVector};
//!
//! let mut v: DeviceVector<i32> = DeviceVector::from_elem(10, 1).unwrap();
//! let first = v.begin();
//!
//! let mut host = vec![0; 5];
//! unsafe {
//!     fill(first..first + 7, 7);
//!     copy(first..first + 5, &mut host[..]);
//! }
//! assert_eq!(host, [7; 5]);
//! ```

pub mod allocator;
pub mod copy;
pub mod error;
pub mod fill;
pub mod policy;
pub mod ptr;
pub mod resolver;
pub mod vec;

pub use devmem_sys as sys;

pub use allocator::{Allocator, DeviceAllocator, HostAllocator};
pub use copy::{copy, copy_with, CopyRange};
pub use error::{Error, Result};
pub use fill::{fill, fill_with, FillRange};
pub use policy::{ExecutionPolicy, Policy};
pub use ptr::{Const, DeviceAddr, DevicePtr, DeviceRef, Mut, Mutability, Pointer};
pub use vec::{DeviceVector, HostVector, Vector};
