//! # Input
//!
//! Host-side controller state that guest code polls through the trampolines

use std::sync::atomic::{AtomicU32, Ordering};

pub mod camera;

use self::camera::{camera_mode, CameraMode};

/// Source of controller state for guest polling
///
/// Calls may come from any thread running guest code, at any time.
pub trait InputService: Send + Sync {
    /// Bitmask of the logical buttons currently held
    fn buttons(&self) -> u32;
    /// Camera axis deflection, each in `[-1, 1]`, interpreted for the current [`CameraMode`]
    fn camera_axes(&self) -> (f32, f32);
}

/// Analog stick deflection stored as two float bit patterns
#[derive(Debug, Default)]
struct Stick {
    /// Horizontal deflection
    x: AtomicU32,
    /// Vertical deflection
    y: AtomicU32,
}
impl Stick {
    /// Stores a deflection, clamped to the unit square
    fn set(&self, x: f32, y: f32) {
        self.x.store(normalize(x).to_bits(), Ordering::Relaxed);
        self.y.store(normalize(y).to_bits(), Ordering::Relaxed);
    }

    /// Loads the last stored deflection
    fn get(&self) -> (f32, f32) {
        (
            f32::from_bits(self.x.load(Ordering::Relaxed)),
            f32::from_bits(self.y.load(Ordering::Relaxed)),
        )
    }
}

/// Clamps an axis to `[-1, 1]`, mapping NaN to the rest position
fn normalize(axis: f32) -> f32 {
    if axis.is_nan() {
        0.0
    } else {
        axis.clamp(-1.0, 1.0)
    }
}

/// Lock-free controller state, updated by a frontend and polled by the guest
///
/// Starts with nothing pressed and both sticks centered.
#[derive(Debug, Default)]
pub struct InputState {
    /// Held buttons
    buttons: AtomicU32,
    /// Left analog stick
    left: Stick,
    /// Right analog stick
    right: Stick,
}
impl InputState {
    /// Creates a neutral controller state
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held buttons
    pub fn set_buttons(&self, buttons: u32) {
        self.buttons.store(buttons, Ordering::Relaxed);
    }

    /// Moves the left stick
    pub fn set_left_stick(&self, x: f32, y: f32) {
        self.left.set(x, y);
    }

    /// Left stick deflection
    pub fn left_stick(&self) -> (f32, f32) {
        self.left.get()
    }

    /// Moves the right stick
    pub fn set_right_stick(&self, x: f32, y: f32) {
        self.right.set(x, y);
    }

    /// Right stick deflection
    pub fn right_stick(&self) -> (f32, f32) {
        self.right.get()
    }
}
impl InputService for InputState {
    fn buttons(&self) -> u32 {
        self.buttons.load(Ordering::Relaxed)
    }

    fn camera_axes(&self) -> (f32, f32) {
        match camera_mode() {
            CameraMode::DualAnalog => self.right_stick(),
            // the right stick is mapped onto the camera buttons instead
            CameraMode::Normal => (0.0, 0.0),
        }
    }
}
