//! This module contains the process-wide camera mode setting

use std::sync::atomic::{AtomicU8, Ordering};

/// How the right analog stick is interpreted
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CameraMode {
    /// Original controls; the right stick stands in for the camera buttons
    #[default]
    Normal = 0,
    /// The right stick drives a free camera
    DualAnalog = 1,
}
impl CameraMode {
    /// Interprets a stored raw value. Anything unrecognized reads as [`CameraMode::Normal`]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::DualAnalog,
            _ => Self::Normal,
        }
    }
}

/// Current camera mode, written by settings code and read by input polling
static CAMERA_MODE: AtomicU8 = AtomicU8::new(CameraMode::Normal as u8);

/// Current camera mode
pub fn camera_mode() -> CameraMode {
    CameraMode::from_raw(CAMERA_MODE.load(Ordering::Relaxed))
}

/// Replaces the camera mode. Takes effect on the next poll
pub fn set_camera_mode(mode: CameraMode) {
    log::debug!("camera mode set to {mode:?}");
    CAMERA_MODE.store(mode as u8, Ordering::Relaxed);
}
