//! # Trampoline
//!
//! The capability table: one declaration per host capability, from which both call shapes are
//! generated.
//!
//! - Every capability gets a [`Capability`] descriptor in [`CAPABILITIES`], named after the guest
//!   symbol, so the runtime can bind translated call sites to [`recomp`] handlers.
//! - Every capability gets a module-level entry point that dispatches to the installed
//!   [`host`]. With the `native` feature it has the typed signature the original target calls;
//!   otherwise it has the uniform recompiled signature.

use std::fmt;

use crate::context::RecompContext;
use crate::host::{self, Host};
use crate::memory::{GuestFault, GuestMemory};

pub mod recomp;

use self::recomp::Handler;

/// Descriptor of a host capability callable from guest code
#[derive(Clone, Copy)]
pub struct Capability {
    /// Guest symbol name
    pub name: &'static str,
    /// Number of logical arguments, identical for both call shapes
    pub arity: usize,
    /// Recompiled-mode handler
    pub handler: Handler,
}
impl Capability {
    /// Runs the recompiled handler against `host`
    ///
    /// Faults are returned to the execution engine, which has to stop the guest.
    pub fn call(
        &self,
        host: &Host,
        mem: &mut dyn GuestMemory,
        ctx: &mut RecompContext,
    ) -> Result<(), GuestFault> {
        dispatch(self.name, self.handler, host, mem, ctx)
    }
}
impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Runs a handler, logging the call and any fault it raises
fn dispatch(
    name: &str,
    handler: Handler,
    host: &Host,
    mem: &mut dyn GuestMemory,
    ctx: &mut RecompContext,
) -> Result<(), GuestFault> {
    log::trace!("guest call {name}");
    handler(host, mem, ctx).map_err(|fault| {
        log::error!("{name} aborted: {fault}");
        fault
    })
}

/// Looks up a capability by guest symbol name
pub fn find(name: &str) -> Option<&'static Capability> {
    CAPABILITIES.iter().find(|cap| cap.name == name)
}

/// Declares the capability list, generating the descriptor table and the entry points
macro_rules! declare_funcs {
    (@count) => { 0 };
    (@count $head:ident $($tail:ident)*) => { 1 + declare_funcs!(@count $($tail)*) };
    ($(
        $(#[$meta:meta])*
        fn $name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)?;
    )*) => {
        /// Every capability, in declaration order
        pub static CAPABILITIES: &[Capability] = &[$(
            Capability {
                name: concat!("recomp_", stringify!($name)),
                arity: declare_funcs!(@count $($arg)*),
                handler: recomp::$name,
            },
        )*];

        $(
            $(#[$meta])*
            #[cfg(feature = "native")]
            pub fn $name($($arg: $ty),*) $(-> $ret)? {
                host::current().$name($($arg),*)
            }

            $(#[$meta])*
            #[cfg(not(feature = "native"))]
            pub fn $name(
                mem: &mut dyn GuestMemory,
                ctx: &mut RecompContext,
            ) -> Result<(), GuestFault> {
                dispatch(
                    concat!("recomp_", stringify!($name)),
                    recomp::$name,
                    &host::current(),
                    mem,
                    ctx,
                )
            }
        )*
    };
}

declare_funcs! {
    /// Writes the bitmask of held buttons to `buttons`
    fn get_item_inputs(buttons: &mut u32);
    /// Writes the camera axis deflection to `x_out` and `y_out`
    fn get_camera_inputs(x_out: &mut f32, y_out: &mut f32);
    /// Emits `size` bytes of `data` to the host's text output
    fn puts(data: &[u8], size: u32);
}
