//! # Recompiled handlers
//!
//! Uniform-signature forms of each capability. A handler decodes its arguments from the register
//! file, resolves guest pointers through guest memory, runs the native form on host values and
//! writes the results back where the guest expects them.

use crate::context::RecompContext;
use crate::convention::o32::decode_args;
use crate::convention::GuestRet;
use crate::host::Host;
use crate::memory::{GuestFault, GuestMemory, GuestPtr};

/// Shape shared by every recompiled handler
///
/// Guest memory and the register file are only borrowed for the duration of the call.
pub type Handler =
    fn(&Host, &mut dyn GuestMemory, &mut RecompContext) -> Result<(), GuestFault>;

/// `void recomp_get_item_inputs(u32* buttons)`
pub fn get_item_inputs(
    host: &Host,
    mem: &mut dyn GuestMemory,
    ctx: &mut RecompContext,
) -> Result<(), GuestFault> {
    let (buttons,): (GuestPtr<u32>,) = decode_args(ctx, &*mem)?;

    let mut value = 0;
    host.get_item_inputs(&mut value);

    buttons.write(mem, value)?;
    ().store(ctx);
    Ok(())
}

/// `void recomp_get_camera_inputs(float* x_out, float* y_out)`
pub fn get_camera_inputs(
    host: &Host,
    mem: &mut dyn GuestMemory,
    ctx: &mut RecompContext,
) -> Result<(), GuestFault> {
    let (x_out, y_out): (GuestPtr<f32>, GuestPtr<f32>) = decode_args(ctx, &*mem)?;

    let (mut x, mut y) = (0.0, 0.0);
    host.get_camera_inputs(&mut x, &mut y);

    x_out.write(&mut *mem, x)?;
    y_out.write(mem, y)?;
    ().store(ctx);
    Ok(())
}

/// `void recomp_puts(const char* data, u32 size)`
pub fn puts(
    host: &Host,
    mem: &mut dyn GuestMemory,
    ctx: &mut RecompContext,
) -> Result<(), GuestFault> {
    let (data, size): (GuestPtr<u8>, u32) = decode_args(ctx, &*mem)?;

    // an empty write never dereferences `data`, so any pointer goes
    if size != 0 {
        // the whole range is resolved before anything reaches the sink
        host.puts(data.slice(&*mem, size)?, size);
    }
    ().store(ctx);
    Ok(())
}
