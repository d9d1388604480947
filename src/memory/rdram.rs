//! This module contains the page-allocated guest memory image

use std::slice;

use region::Protection;
use thiserror::Error;

use super::GuestMemory;

/// Guest address of the start of KSEG0, where cached RDRAM is mapped
pub const KSEG0_BASE: u32 = 0x8000_0000;

/// Size of RDRAM with the expansion pak installed (8 MiB)
pub const RDRAM_SIZE: usize = 0x80_0000;

/// Errors when reserving a memory image
#[derive(Debug, Error)]
pub enum RdramError {
    /// The image would not fit in the 32-bit guest address space
    #[error("{size:#x} bytes at {base:#010x} exceed the guest address space")]
    TooLarge {
        /// Requested base address
        base: u32,
        /// Requested size
        size: usize,
    },
    /// Error while allocating host pages
    #[error("Error allocating guest memory")]
    AllocationError(#[from] region::Error),
}

/// Guest memory image backed by its own read/write host pages
///
/// Pages come zero-filled from the host allocator. The image is never resized or moved, so
/// the execution engine may keep it for the whole session and lend it to every call.
pub struct Rdram {
    /// Host pages holding the image. Rounded up to the page size, so it may be larger than `size`
    pages: region::Allocation,
    /// Guest address of the first byte
    base: u32,
    /// Usable size in bytes
    size: usize,
}
impl Rdram {
    /// Reserves `size` bytes of zeroed guest memory starting at guest address `base`
    pub fn new(base: u32, size: usize) -> Result<Self, RdramError> {
        if base as u64 + size as u64 > 1 << 32 {
            return Err(RdramError::TooLarge { base, size });
        }
        // region refuses empty allocations; keep one page around for a zero-sized image
        let pages = region::alloc(size.max(1), Protection::READ_WRITE)?;
        Ok(Self { pages, base, size })
    }

    /// Reserves a full expansion-pak RDRAM image mapped at KSEG0
    pub fn kseg0() -> Result<Self, RdramError> {
        Self::new(KSEG0_BASE, RDRAM_SIZE)
    }

    /// Usable size in bytes
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the image has no addressable bytes
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}
impl GuestMemory for Rdram {
    fn base(&self) -> u32 {
        self.base
    }

    fn image(&self) -> &[u8] {
        // Safety: `pages` is a live read/write allocation of at least `size` bytes owned by `self`
        unsafe { slice::from_raw_parts(self.pages.as_ptr::<u8>(), self.size) }
    }

    fn image_mut(&mut self) -> &mut [u8] {
        // Safety: as above, and `&mut self` guarantees the borrow is unique
        unsafe { slice::from_raw_parts_mut(self.pages.as_mut_ptr::<u8>(), self.size) }
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::rdram::{Rdram, RdramError, KSEG0_BASE, RDRAM_SIZE};
    use crate::memory::GuestMemory;

    #[test]
    /// Fresh images are zeroed and span exactly the requested range
    fn test_new() {
        let mem = Rdram::new(0x1000, 0x20).unwrap();

        assert_eq!(mem.len(), 0x20);
        assert_eq!(mem.base(), 0x1000);
        assert!(mem.image().iter().all(|&b| b == 0));

        // the page allocation is larger, but the image must not be
        assert!(mem.bytes(0x1020, 1).is_err());
    }

    #[test]
    /// The KSEG0 image covers the whole expansion pak
    fn test_kseg0() {
        let mem = Rdram::kseg0().unwrap();

        assert_eq!(mem.base(), KSEG0_BASE);
        assert_eq!(mem.len(), RDRAM_SIZE);
        assert!(mem.bytes(0x807f_fffc, 4).is_ok());
        assert!(mem.bytes(0x8080_0000, 1).is_err());
    }

    #[test]
    /// Images may not wrap the guest address space
    fn test_too_large() {
        assert!(matches!(
            Rdram::new(0xffff_0000, 0x2_0000),
            Err(RdramError::TooLarge { .. })
        ));
        assert!(Rdram::new(0xffff_0000, 0x1_0000).is_ok());
    }

    #[test]
    /// An empty image rejects everything but empty accesses
    fn test_empty() {
        let mem = Rdram::new(0, 0).unwrap();

        assert!(mem.is_empty());
        assert!(mem.bytes(0, 0).is_ok());
        assert!(mem.bytes(0, 1).is_err());
    }
}
