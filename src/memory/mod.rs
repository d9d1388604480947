//! # Memory
//!
//! Guest memory is the address space recompiled code sees: a byte image in the original target's
//! big-endian byte order, addressed by 32-bit guest addresses.
//!
//! Guest pointers are never turned into host pointers. Every access resolves through
//! [`GuestMemory::bytes`] or [`GuestMemory::bytes_mut`], which are the only places bounds are checked.

use std::marker::PhantomData;
use std::ops::Range;

use thiserror::Error;

pub mod rdram;

/// Fatal conditions raised while servicing a guest call
///
/// A fault means the decoded arguments are garbage, so the execution engine must stop running the
/// guest rather than resume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuestFault {
    /// A guest address range falls outside the memory image
    #[error("out-of-bounds guest access: {len} bytes at {addr:#010x}")]
    OutOfBounds {
        /// First guest address of the access
        addr: u32,
        /// Length of the access in bytes
        len: u32,
    },
}

/// Byte-addressable guest memory
///
/// Implementors only expose the raw image and its base address; the provided methods do the
/// address translation and bounds checks.
pub trait GuestMemory {
    /// Guest address of the first byte of the image
    fn base(&self) -> u32;
    /// Entire image, in guest byte order
    fn image(&self) -> &[u8];
    /// Entire image, mutable
    fn image_mut(&mut self) -> &mut [u8];

    /// Borrows `len` bytes starting at guest address `addr`
    fn bytes(&self, addr: u32, len: u32) -> Result<&[u8], GuestFault> {
        let range = resolve(self.base(), self.image().len(), addr, len)?;
        Ok(&self.image()[range])
    }

    /// Mutably borrows `len` bytes starting at guest address `addr`
    fn bytes_mut(&mut self, addr: u32, len: u32) -> Result<&mut [u8], GuestFault> {
        let range = resolve(self.base(), self.image().len(), addr, len)?;
        Ok(&mut self.image_mut()[range])
    }

    /// Reads a big-endian word
    fn read_u32(&self, addr: u32) -> Result<u32, GuestFault> {
        GuestPtr::<u32>::new(addr).read(self)
    }

    /// Writes a big-endian word
    fn write_u32(&mut self, addr: u32, value: u32) -> Result<(), GuestFault> {
        GuestPtr::<u32>::new(addr).write(self, value)
    }
}

/// Translates a guest address range into an index range of an image of `size` bytes
fn resolve(base: u32, size: usize, addr: u32, len: u32) -> Result<Range<usize>, GuestFault> {
    let fault = GuestFault::OutOfBounds { addr, len };
    let start = addr.checked_sub(base).ok_or(fault)? as usize;
    let end = start.checked_add(len as usize).ok_or(fault)?;
    if end > size {
        return Err(fault);
    }
    Ok(start..end)
}

/// Plain values that can live in guest memory
pub trait GuestValue: Copy {
    /// Size in guest memory, in bytes
    const SIZE: u32;
    /// Decodes a value from exactly [`Self::SIZE`] guest-order bytes
    fn load(bytes: &[u8]) -> Self;
    /// Encodes a value into exactly [`Self::SIZE`] guest-order bytes
    fn store(self, bytes: &mut [u8]);
}

/// Implements [`GuestValue`] for primitives with big-endian byte conversions
macro_rules! impl_guest_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl GuestValue for $ty {
                const SIZE: u32 = std::mem::size_of::<$ty>() as u32;

                fn load(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_be_bytes(raw)
                }

                fn store(self, bytes: &mut [u8]) {
                    bytes.copy_from_slice(&self.to_be_bytes());
                }
            }
        )*
    };
}

impl_guest_value!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Typed pointer into guest memory
///
/// This is only a guest address; it has to be resolved against a [`GuestMemory`] on every access.
#[derive(Debug, PartialEq, Eq)]
pub struct GuestPtr<T> {
    /// Guest address being pointed at
    addr: u32,
    /// Pointee type
    _marker: PhantomData<fn() -> T>,
}
impl<T> Clone for GuestPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for GuestPtr<T> {}

impl<T> GuestPtr<T> {
    /// Creates a pointer to guest address `addr`
    pub const fn new(addr: u32) -> Self {
        Self {
            addr,
            _marker: PhantomData,
        }
    }

    /// Guest address of the pointee
    pub fn addr(self) -> u32 {
        self.addr
    }
}

impl<T: GuestValue> GuestPtr<T> {
    /// Reads the pointee
    pub fn read<M: GuestMemory + ?Sized>(self, mem: &M) -> Result<T, GuestFault> {
        mem.bytes(self.addr, T::SIZE).map(T::load)
    }

    /// Overwrites the pointee
    pub fn write<M: GuestMemory + ?Sized>(self, mem: &mut M, value: T) -> Result<(), GuestFault> {
        value.store(mem.bytes_mut(self.addr, T::SIZE)?);
        Ok(())
    }
}

impl GuestPtr<u8> {
    /// Borrows `len` bytes starting at the pointee
    pub fn slice<M: GuestMemory + ?Sized>(self, mem: &M, len: u32) -> Result<&[u8], GuestFault> {
        mem.bytes(self.addr, len)
    }
}
