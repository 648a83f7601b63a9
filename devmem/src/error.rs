//! Error types for container operations.

use devmem_sys::AllocError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The allocator could not provide the requested buffer.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// The requested capacity does not fit in `usize`.
    #[error("capacity overflow")]
    CapacityOverflow,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
