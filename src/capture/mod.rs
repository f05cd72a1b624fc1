//! Camera input and frame handling.
//!
//! This module provides the capture device boundary (open by index,
//! read a frame, close), the resource manager that probes for a working
//! device, and the frame type passed to decoding and display.

mod camera;
mod frame;
mod manager;
mod mock;
#[cfg(feature = "camera")]
mod native;

pub use camera::{Camera, CameraBackend, CameraError, CameraHandle};
pub use frame::{Frame, PixelFormat};
pub use manager::{probe, CameraManager};
pub use mock::{MockBackend, MockCamera};
#[cfg(feature = "camera")]
pub use native::{NokhwaBackend, NokhwaCamera};
