//! # Context
//!
//! Register file of the emulated VR4300 at a call boundary.
//!
//! General purpose registers are 64 bits wide. Recompiled code built for the 32-bit ABI keeps
//! 32-bit values sign-extended in them, which the accessors here preserve.

/// Hardwired zero register
pub const ZERO: usize = 0;
/// First return value register
pub const V0: usize = 2;
/// Second return value register
pub const V1: usize = 3;
/// First argument register
pub const A0: usize = 4;
/// Second argument register
pub const A1: usize = 5;
/// Third argument register
pub const A2: usize = 6;
/// Fourth argument register
pub const A3: usize = 7;
/// Stack pointer
pub const SP: usize = 29;
/// Return address
pub const RA: usize = 31;

/// Float return value register
pub const F0: usize = 0;
/// First float argument register
pub const F12: usize = 12;
/// Second float argument register
pub const F14: usize = 14;

/// Emulated register file
///
/// Owned by the execution engine and lent to each trampoline call.
#[repr(C)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecompContext {
    /// General purpose registers
    pub gpr: [u64; 32],
    /// Floating point registers as raw bits. Single precision values occupy the low word
    pub fpr: [u64; 32],
    /// Multiply/divide high result
    pub hi: u64,
    /// Multiply/divide low result
    pub lo: u64,
}

impl RecompContext {
    /// Reads a full general purpose register
    pub fn gpr(&self, reg: usize) -> u64 {
        if reg == ZERO {
            0
        } else {
            self.gpr[reg]
        }
    }

    /// Writes a full general purpose register. Writes to `$zero` are dropped
    pub fn set_gpr(&mut self, reg: usize, value: u64) {
        if reg != ZERO {
            self.gpr[reg] = value;
        }
    }

    /// Low word of a general purpose register
    pub fn gpr_u32(&self, reg: usize) -> u32 {
        self.gpr(reg) as u32
    }

    /// Writes a 32-bit value sign-extended, as 32-bit MIPS code expects
    pub fn set_gpr_u32(&mut self, reg: usize, value: u32) {
        self.set_gpr(reg, value as i32 as i64 as u64);
    }

    /// Single precision value held in a float register
    pub fn fpr_f32(&self, reg: usize) -> f32 {
        f32::from_bits(self.fpr[reg] as u32)
    }

    /// Writes a single precision value into a float register, clearing the high word
    pub fn set_fpr_f32(&mut self, reg: usize, value: f32) {
        self.fpr[reg] = value.to_bits() as u64;
    }
}

#[cfg(test)]
mod tests {
    use crate::context::{RecompContext, A0, F12, V0, ZERO};

    #[test]
    /// `$zero` can't be written
    fn test_zero_register() {
        let mut ctx = RecompContext::default();

        ctx.set_gpr(ZERO, 5);

        assert_eq!(ctx.gpr(ZERO), 0);
    }

    #[test]
    /// 32-bit writes are sign-extended and 32-bit reads truncate
    fn test_sign_extension() {
        let mut ctx = RecompContext::default();

        ctx.set_gpr_u32(V0, 0x8000_1000);
        assert_eq!(ctx.gpr(V0), 0xffff_ffff_8000_1000);

        ctx.set_gpr(A0, 0xffff_ffff_8000_2000);
        assert_eq!(ctx.gpr_u32(A0), 0x8000_2000);
    }

    #[test]
    /// Single precision values live in the low word of a float register
    fn test_float_register() {
        let mut ctx = RecompContext::default();
        ctx.fpr[F12] = 0xdead_beef_0000_0000;

        ctx.set_fpr_f32(F12, 1.5);

        assert_eq!(ctx.fpr[F12], 1.5f32.to_bits() as u64);
        assert_eq!(ctx.fpr_f32(F12), 1.5);
    }
}
