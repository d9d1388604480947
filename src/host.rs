//! # Host
//!
//! The host capabilities exposed to guest code, in their native-target form.
//!
//! [`Host`] pairs an input service with a text sink. Its methods take ordinary typed arguments and are
//! what the recompiled handlers forward to once arguments have been pulled out of guest state.

use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;

use crate::input::{InputService, InputState};
use crate::output::{StdoutSink, TextSink};

/// Services backing the capabilities
#[derive(Clone)]
pub struct Host {
    /// Controller state
    input: Arc<dyn InputService>,
    /// Destination for guest text
    sink: Arc<dyn TextSink>,
}
impl Host {
    /// Creates a host from its services
    pub fn new(input: Arc<dyn InputService>, sink: Arc<dyn TextSink>) -> Self {
        Self { input, sink }
    }

    /// Input service in use
    pub fn input(&self) -> &dyn InputService {
        &*self.input
    }

    /// Text sink in use
    pub fn sink(&self) -> &dyn TextSink {
        &*self.sink
    }

    /// Stores the currently held buttons into `buttons`
    pub fn get_item_inputs(&self, buttons: &mut u32) {
        *buttons = self.input.buttons();
    }

    /// Stores the camera axis deflection into `x_out` and `y_out`
    pub fn get_camera_inputs(&self, x_out: &mut f32, y_out: &mut f32) {
        (*x_out, *y_out) = self.input.camera_axes();
    }

    /// Emits the first `size` bytes of `data`
    ///
    /// Output stops at the end of `data` if `size` runs past it. A failing sink drops the text,
    /// since guest code has no way to react to it.
    pub fn puts(&self, data: &[u8], size: u32) {
        let requested = size as usize;
        if requested > data.len() {
            log::warn!(
                "guest output truncated to {} of {requested} bytes",
                data.len()
            );
        }
        let data = &data[..requested.min(data.len())];
        if data.is_empty() {
            return;
        }
        if let Err(e) = self.sink.write(data) {
            log::warn!("dropped {} bytes of guest output: {e}", data.len());
        }
    }
}
impl Default for Host {
    /// Neutral controller and standard output
    fn default() -> Self {
        Self::new(Arc::new(InputState::new()), Arc::new(StdoutSink))
    }
}

lazy_static! {
    /// Host used by the entry points in [`crate::trampoline`]
    static ref HOST: RwLock<Arc<Host>> = RwLock::new(Arc::new(Host::default()));
}

/// Replaces the process-wide host, returning the previous one
///
/// Calls already running keep the host they started with.
pub fn install(host: Host) -> Arc<Host> {
    let mut current = HOST.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    std::mem::replace(&mut *current, Arc::new(host))
}

/// Process-wide host
pub fn current() -> Arc<Host> {
    HOST.read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use crate::host::{self, Host};
    use crate::input::camera::{set_camera_mode, CameraMode};
    use crate::input::InputState;
    use crate::output::{CaptureSink, TextSink};

    /// Sink that is never available
    struct BrokenSink;
    impl TextSink for BrokenSink {
        fn write(&self, _data: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    /// Host over fresh services, handing back the services for inspection
    fn setup() -> (Host, Arc<InputState>, Arc<CaptureSink>) {
        let input = Arc::new(InputState::new());
        let sink = Arc::new(CaptureSink::new());
        (Host::new(input.clone(), sink.clone()), input, sink)
    }

    #[test]
    /// Native forms write straight through their out-parameters
    fn test_native_inputs() {
        let _globals = crate::lock_globals();
        let (host, input, _) = setup();
        input.set_buttons(0x0001);
        input.set_right_stick(-1.0, 0.5);
        set_camera_mode(CameraMode::DualAnalog);

        let mut buttons = 0;
        let (mut x, mut y) = (0.0, 0.0);
        host.get_item_inputs(&mut buttons);
        host.get_camera_inputs(&mut x, &mut y);

        set_camera_mode(CameraMode::Normal);
        assert_eq!(buttons, 1);
        assert_eq!((x, y), (-1.0, 0.5));
    }

    #[test]
    /// `puts` forwards exactly `size` bytes, and nothing for a size of zero
    fn test_native_puts() {
        let (host, _, sink) = setup();

        host.puts(b"hello world", 5);
        host.puts(b"ignored", 0);

        assert_eq!(sink.contents(), b"hello");
    }

    #[test]
    /// A size past the end of the buffer emits the buffer and nothing beyond it
    fn test_native_puts_overrun() {
        let (host, _, sink) = setup();

        host.puts(b"abc", 4);
        host.puts(b"", 8);

        assert_eq!(sink.contents(), b"abc");
    }

    #[test]
    /// A broken sink doesn't fail the call
    fn test_sink_failure() {
        let host = Host::new(Arc::new(InputState::new()), Arc::new(BrokenSink));

        // must return normally
        host.puts(b"lost", 4);
    }

    #[test]
    /// Installing a host swaps what `current` returns
    fn test_install() {
        let _globals = crate::lock_globals();
        let (replacement, input, _) = setup();
        input.set_buttons(0x20);

        let previous = host::install(replacement);
        let mut buttons = 0;
        host::current().get_item_inputs(&mut buttons);
        host::install(Host::clone(&previous));

        assert_eq!(buttons, 0x20);
    }
}
