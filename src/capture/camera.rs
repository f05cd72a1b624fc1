//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and scripted implementations for
//! testing. A [`CameraBackend`] opens devices by index; each open device
//! is wrapped in a [`CameraHandle`] that owns it exclusively.

use super::Frame;
use crate::config::CaptureConfig;
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// Every probed index failed to open.
    #[error("no camera device opened after probing {probed} indices")]
    NotFound {
        /// How many indices were tried.
        probed: u32,
    },
    /// One device index failed to open.
    #[error("failed to open camera {index}: {reason}")]
    OpenFailed {
        /// Device index.
        index: u32,
        /// Backend's description of the failure.
        reason: String,
    },
    /// A frame read failed.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// The device was already closed.
    #[error("camera is closed")]
    Closed,
    /// Any other backend failure.
    #[error("camera backend error: {0}")]
    Backend(String),
}

/// An open capture device.
pub trait Camera {
    /// Device index this camera was opened at.
    fn index(&self) -> u32;

    /// Reads a single frame. May block on hardware I/O.
    fn read_frame(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources. Closing twice is a no-op.
    fn close(&mut self);
}

/// Opens capture devices by index.
pub trait CameraBackend {
    /// Attempts to open the device at `index`.
    fn open_device(
        &mut self,
        index: u32,
        config: &CaptureConfig,
    ) -> Result<Box<dyn Camera>, CameraError>;
}

/// Exclusive ownership of an open capture device.
///
/// The device is closed when the handle is released or dropped,
/// whichever happens first.
pub struct CameraHandle {
    device: Box<dyn Camera>,
}

impl CameraHandle {
    /// Wraps an opened device.
    pub fn new(device: Box<dyn Camera>) -> Self {
        Self { device }
    }

    /// Device index of the underlying camera.
    pub fn index(&self) -> u32 {
        self.device.index()
    }

    /// Returns true while the underlying device is open.
    pub fn is_open(&self) -> bool {
        self.device.is_open()
    }

    /// Reads one frame from the device.
    pub fn read_frame(&mut self) -> Result<Frame, CameraError> {
        if !self.device.is_open() {
            return Err(CameraError::Closed);
        }
        self.device.read_frame()
    }

    /// Closes the device. Safe to call on an already closed handle.
    pub fn close(&mut self) {
        if self.device.is_open() {
            self.device.close();
            tracing::debug!(index = self.device.index(), "Camera handle closed");
        }
    }
}

impl Drop for CameraHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for CameraHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraHandle")
            .field("index", &self.index())
            .field("open", &self.is_open())
            .finish()
    }
}
