//! Camera acquisition and release.
//!
//! Device enumeration order is not stable on every system, and index 0
//! is sometimes a virtual or busy device, so acquisition probes a small
//! range of indices and keeps the first one that opens.

use super::{CameraBackend, CameraError, CameraHandle};
use crate::config::CaptureConfig;

/// Probes device indices `0..probe_count` in ascending order.
///
/// Returns a handle for the first device that opens, or
/// [`CameraError::NotFound`] when none does. No retry is performed.
pub fn probe<B>(backend: &mut B, config: &CaptureConfig) -> Result<CameraHandle, CameraError>
where
    B: CameraBackend + ?Sized,
{
    for index in 0..config.probe_count {
        match backend.open_device(index, config) {
            Ok(device) if device.is_open() => {
                tracing::info!(index, "Camera acquired");
                return Ok(CameraHandle::new(device));
            }
            Ok(mut device) => {
                device.close();
                tracing::debug!(index, "Camera reported closed right after open");
            }
            Err(e) => {
                tracing::debug!(index, error = %e, "Camera probe failed");
            }
        }
    }

    tracing::warn!(probed = config.probe_count, "No camera device found");
    Err(CameraError::NotFound {
        probed: config.probe_count,
    })
}

/// Owns the backend and at most one open [`CameraHandle`].
pub struct CameraManager<B> {
    backend: B,
    config: CaptureConfig,
    handle: Option<CameraHandle>,
}

impl<B: CameraBackend> CameraManager<B> {
    /// Creates a manager with no device open.
    pub fn new(backend: B, config: CaptureConfig) -> Self {
        Self {
            backend,
            config,
            handle: None,
        }
    }

    /// Ensures a device is open and returns its index.
    ///
    /// An already open handle is kept as is; the backend is only
    /// probed when no healthy handle exists.
    pub fn acquire(&mut self) -> Result<u32, CameraError> {
        if let Some(handle) = &self.handle {
            if handle.is_open() {
                return Ok(handle.index());
            }
        }
        // A handle whose device died underneath it is discarded first
        self.handle = None;

        let handle = probe(&mut self.backend, &self.config)?;
        let index = handle.index();
        self.handle = Some(handle);
        Ok(index)
    }

    /// Closes the open device, if any.
    ///
    /// Returns true when a device was actually closed.
    pub fn release(&mut self) -> bool {
        match self.handle.take() {
            Some(mut handle) => {
                let was_open = handle.is_open();
                handle.close();
                if was_open {
                    tracing::info!(index = handle.index(), "Camera released");
                }
                was_open
            }
            None => false,
        }
    }

    /// Returns true when a healthy handle is held.
    pub fn is_open(&self) -> bool {
        self.handle.as_ref().is_some_and(CameraHandle::is_open)
    }

    /// Index of the open device, if any.
    pub fn index(&self) -> Option<u32> {
        self.handle
            .as_ref()
            .filter(|h| h.is_open())
            .map(CameraHandle::index)
    }

    /// Borrows the open handle for the duration of one tick.
    pub fn handle_mut(&mut self) -> Option<&mut CameraHandle> {
        self.handle.as_mut().filter(|h| h.is_open())
    }

}

impl<B> Drop for CameraManager<B> {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
        }
    }
}
