//! # Output
//!
//! Destinations for text emitted by guest code

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

/// Accepts raw bytes from the guest
///
/// Bytes are passed through untouched: no encoding, no terminator, no added newline.
pub trait TextSink: Send + Sync {
    /// Emits `data`
    fn write(&self, data: &[u8]) -> io::Result<()>;
}

/// Writes guest text to the process's standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;
impl TextSink for StdoutSink {
    fn write(&self, data: &[u8]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        stdout.flush()
    }
}

/// Collects guest text in memory
#[derive(Debug, Default)]
pub struct CaptureSink {
    /// Everything written so far
    buffer: Mutex<Vec<u8>>,
}
impl CaptureSink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far
    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Takes everything written so far, leaving the sink empty
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.lock())
    }

    /// Locks the buffer. A writer can't leave it half-updated, so poisoning is ignored
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
impl TextSink for CaptureSink {
    fn write(&self, data: &[u8]) -> io::Result<()> {
        self.lock().extend_from_slice(data);
        Ok(())
    }
}
