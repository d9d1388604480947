//! # Convention
//!
//! This module moves values between the guest calling convention and host types
//!
//! ## Guest calling convention
//!
//! Recompiled code follows the MIPS O32 convention of the original target, see [`o32`] for the
//! argument register assignment.
//! - args: a0, a1, a2, a3, stack (starting at sp + 16)
//! - leading float args: f12, f14
//! - 64-bit args: even/odd slot pair, high word first
//! - return: v0, v0:v1 for 64-bit values, f0 for floats

use crate::context::{RecompContext, F0, V0, V1};
use crate::memory::{GuestFault, GuestPtr};

pub mod o32;

/// Walks the argument slots of a single call in order
pub trait ArgCursor {
    /// Next 32-bit integer or pointer argument
    fn next_u32(&mut self) -> Result<u32, GuestFault>;
    /// Next 64-bit integer argument
    fn next_u64(&mut self) -> Result<u64, GuestFault>;
    /// Next single precision argument
    fn next_f32(&mut self) -> Result<f32, GuestFault>;
}

/// A single argument that can be decoded from a guest call
pub trait GuestArg: Sized {
    /// Pulls this argument off the cursor
    fn decode<C: ArgCursor>(args: &mut C) -> Result<Self, GuestFault>;
}

impl GuestArg for u32 {
    fn decode<C: ArgCursor>(args: &mut C) -> Result<Self, GuestFault> {
        args.next_u32()
    }
}

impl GuestArg for i32 {
    fn decode<C: ArgCursor>(args: &mut C) -> Result<Self, GuestFault> {
        args.next_u32().map(|v| v as i32)
    }
}

impl GuestArg for u64 {
    fn decode<C: ArgCursor>(args: &mut C) -> Result<Self, GuestFault> {
        args.next_u64()
    }
}

impl GuestArg for i64 {
    fn decode<C: ArgCursor>(args: &mut C) -> Result<Self, GuestFault> {
        args.next_u64().map(|v| v as i64)
    }
}

impl GuestArg for f32 {
    fn decode<C: ArgCursor>(args: &mut C) -> Result<Self, GuestFault> {
        args.next_f32()
    }
}

impl<T> GuestArg for GuestPtr<T> {
    fn decode<C: ArgCursor>(args: &mut C) -> Result<Self, GuestFault> {
        args.next_u32().map(GuestPtr::new)
    }
}

/// A full argument list, decoded left to right
pub trait GuestArgs: Sized {
    /// Number of logical arguments
    const ARITY: usize;
    /// Decodes every argument in order
    fn decode<C: ArgCursor>(args: &mut C) -> Result<Self, GuestFault>;
}

/// Implements [`GuestArgs`] for tuples of [`GuestArg`]s
macro_rules! impl_guest_args {
    ($($arity:literal => ($($name:ident),*);)*) => {
        $(
            impl<$($name: GuestArg),*> GuestArgs for ($($name,)*) {
                const ARITY: usize = $arity;

                #[allow(unused_variables)]
                fn decode<Cur: ArgCursor>(args: &mut Cur) -> Result<Self, GuestFault> {
                    Ok(($($name::decode(args)?,)*))
                }
            }
        )*
    };
}

impl_guest_args! {
    0 => ();
    1 => (A);
    2 => (A, B);
    3 => (A, B, C);
    4 => (A, B, C, D);
    5 => (A, B, C, D, E);
    6 => (A, B, C, D, E, F);
}

/// A return value that can be handed back to the guest
pub trait GuestRet {
    /// Writes the value into the return registers
    fn store(self, ctx: &mut RecompContext);
}

impl GuestRet for () {
    fn store(self, _ctx: &mut RecompContext) {}
}

impl GuestRet for u32 {
    fn store(self, ctx: &mut RecompContext) {
        ctx.set_gpr_u32(V0, self);
    }
}

impl GuestRet for i32 {
    fn store(self, ctx: &mut RecompContext) {
        ctx.set_gpr_u32(V0, self as u32);
    }
}

impl GuestRet for u64 {
    fn store(self, ctx: &mut RecompContext) {
        ctx.set_gpr_u32(V0, (self >> 32) as u32);
        ctx.set_gpr_u32(V1, self as u32);
    }
}

impl GuestRet for f32 {
    fn store(self, ctx: &mut RecompContext) {
        ctx.set_fpr_f32(F0, self);
    }
}

impl<T> GuestRet for GuestPtr<T> {
    fn store(self, ctx: &mut RecompContext) {
        ctx.set_gpr_u32(V0, self.addr());
    }
}
