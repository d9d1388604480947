#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::missing_crate_level_docs)]
#![doc = include_str!("../README.md")]

pub mod context;
pub mod convention;
pub mod host;
pub mod input;
pub mod memory;
pub mod output;
pub mod trampoline;

/// Serializes tests that touch process-wide state (camera mode, installed host)
#[cfg(test)]
pub(crate) static GLOBAL_STATE: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Takes the global state lock, ignoring poisoning from a failed test
#[cfg(test)]
pub(crate) fn lock_globals() -> std::sync::MutexGuard<'static, ()> {
    GLOBAL_STATE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
