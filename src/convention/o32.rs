//! # O32
//!
//! Argument register assignment of the MIPS O32 convention
//!
//! Every argument takes one or more 32-bit slots. Slots 0-3 travel in a0-a3 and the rest live in the
//! caller's frame at `sp + 4 * slot`, above the 16-byte home area reserved for the first four.
//! Floats at the start of the list travel in f12 and f14 instead, but still use up a slot.

use crate::context::{RecompContext, A0, F12, SP};
use crate::memory::{GuestFault, GuestMemory};

use super::{ArgCursor, GuestArgs};

/// Slots passed in registers
const REGISTER_SLOTS: u32 = 4;

/// Leading floats passed in float registers
const FLOAT_REGISTER_SLOTS: u32 = 2;

/// Decodes the arguments of a single call from the register file
pub struct O32Cursor<'a> {
    /// Register file at the call
    ctx: &'a RecompContext,
    /// Guest memory, for arguments passed on the stack
    mem: &'a dyn GuestMemory,
    /// Next slot to read
    slot: u32,
    /// Cleared by the first non-float argument, after which floats travel in integer slots
    leading_floats: bool,
}
impl<'a> O32Cursor<'a> {
    /// Starts decoding at the first argument
    pub fn new(ctx: &'a RecompContext, mem: &'a dyn GuestMemory) -> Self {
        Self {
            ctx,
            mem,
            slot: 0,
            leading_floats: true,
        }
    }

    /// Raw contents of the next slot
    fn word(&mut self) -> Result<u32, GuestFault> {
        let slot = self.slot;
        self.slot += 1;
        if slot < REGISTER_SLOTS {
            Ok(self.ctx.gpr_u32(A0 + slot as usize))
        } else {
            let sp = self.ctx.gpr_u32(SP);
            self.mem.read_u32(sp.wrapping_add(4 * slot))
        }
    }
}
impl ArgCursor for O32Cursor<'_> {
    fn next_u32(&mut self) -> Result<u32, GuestFault> {
        self.leading_floats = false;
        self.word()
    }

    fn next_u64(&mut self) -> Result<u64, GuestFault> {
        self.leading_floats = false;
        // 64-bit values start on an even slot
        self.slot = (self.slot + 1) & !1;
        let hi = self.word()?;
        let lo = self.word()?;
        Ok((hi as u64) << 32 | lo as u64)
    }

    fn next_f32(&mut self) -> Result<f32, GuestFault> {
        if self.leading_floats && self.slot < FLOAT_REGISTER_SLOTS {
            let reg = F12 + 2 * self.slot as usize;
            self.slot += 1;
            Ok(self.ctx.fpr_f32(reg))
        } else {
            self.leading_floats = false;
            self.word().map(f32::from_bits)
        }
    }
}

/// Decodes a whole argument list from a call's register file
pub fn decode_args<A: GuestArgs>(
    ctx: &RecompContext,
    mem: &dyn GuestMemory,
) -> Result<A, GuestFault> {
    A::decode(&mut O32Cursor::new(ctx, mem))
}

#[cfg(test)]
mod tests {
    use crate::context::{RecompContext, A0, A1, A2, A3, F12, F14, SP};
    use crate::convention::o32::decode_args;
    use crate::memory::rdram::Rdram;
    use crate::memory::{GuestFault, GuestMemory, GuestPtr};

    /// Register file with `a0..a3` loaded and a stack at the top of a small image
    fn setup() -> (RecompContext, Rdram) {
        let mut ctx = RecompContext::default();
        ctx.set_gpr_u32(A0, 0x8000_0100);
        ctx.set_gpr_u32(A1, 0x8000_0200);
        ctx.set_gpr_u32(A2, 3);
        ctx.set_gpr_u32(A3, 4);
        ctx.set_gpr_u32(SP, 0x8000_0f00);
        (ctx, Rdram::new(0x8000_0000, 0x1000).unwrap())
    }

    #[test]
    /// Integer and pointer arguments come out of a0-a3 in order
    fn test_integer_registers() {
        let (ctx, mem) = setup();

        let (buttons, data, size): (GuestPtr<u32>, GuestPtr<u8>, u32) =
            decode_args(&ctx, &mem).unwrap();

        assert_eq!(buttons.addr(), 0x8000_0100);
        assert_eq!(data.addr(), 0x8000_0200);
        assert_eq!(size, 3);
    }

    #[test]
    /// Pointers are the low word of a sign-extended register
    fn test_sign_extended_pointer() {
        let (mut ctx, mem) = setup();
        ctx.set_gpr(A0, 0xffff_ffff_8000_1234);

        let (ptr,): (GuestPtr<u8>,) = decode_args(&ctx, &mem).unwrap();

        assert_eq!(ptr.addr(), 0x8000_1234);
    }

    #[test]
    /// Arguments past the fourth slot are read from the caller's frame
    fn test_stack_arguments() {
        let (ctx, mut mem) = setup();
        mem.write_u32(0x8000_0f10, 5).unwrap();
        mem.write_u32(0x8000_0f14, 6).unwrap();

        let args: (u32, u32, u32, u32, u32, i32) = decode_args(&ctx, &mem).unwrap();

        assert_eq!(args.4, 5);
        assert_eq!(args.5, 6);
    }

    #[test]
    /// A stack pointer outside guest memory faults instead of reading host memory
    fn test_stack_out_of_bounds() {
        let (mut ctx, mem) = setup();
        ctx.set_gpr_u32(SP, 0x9000_0000);

        let result: Result<(u32, u32, u32, u32, u32), _> = decode_args(&ctx, &mem);

        assert_eq!(
            result,
            Err(GuestFault::OutOfBounds {
                addr: 0x9000_0010,
                len: 4
            })
        );
    }

    #[test]
    /// Leading floats use f12 and f14 but still consume a0 and a1
    fn test_leading_floats() {
        let (mut ctx, mem) = setup();
        ctx.set_fpr_f32(F12, 0.25);
        ctx.set_fpr_f32(F14, -0.75);

        let (x, y, z): (f32, f32, u32) = decode_args(&ctx, &mem).unwrap();

        assert_eq!((x, y), (0.25, -0.75));
        assert_eq!(z, 3);
    }

    #[test]
    /// Floats after an integer travel in integer registers
    fn test_trailing_float() {
        let (mut ctx, mem) = setup();
        ctx.set_fpr_f32(F14, 9.0);
        ctx.set_gpr_u32(A1, 1.5f32.to_bits());

        let (_, f): (u32, f32) = decode_args(&ctx, &mem).unwrap();

        assert_eq!(f, 1.5);
    }

    #[test]
    /// 64-bit arguments skip to an even slot and read high word first
    fn test_u64_alignment() {
        let (mut ctx, mem) = setup();
        ctx.set_gpr_u32(A2, 0x0000_0001);
        ctx.set_gpr_u32(A3, 0x8000_0000);

        let (_, wide): (u32, u64) = decode_args(&ctx, &mem).unwrap();

        assert_eq!(wide, 0x0000_0001_8000_0000);
    }
}
