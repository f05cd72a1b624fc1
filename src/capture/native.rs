//! Native camera backend built on `nokhwa`.

use super::{Camera, CameraBackend, CameraError, Frame, PixelFormat};
use crate::config::CaptureConfig;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};

/// Frame rate asked for alongside the configured resolution.
const REQUESTED_FPS: u32 = 30;

/// The stream format asked of a device for `config`.
fn wanted_format(config: &CaptureConfig) -> CameraFormat {
    CameraFormat::new(
        Resolution::new(config.width, config.height),
        FrameFormat::MJPEG,
        REQUESTED_FPS,
    )
}

/// Opens platform cameras through `nokhwa`.
#[derive(Debug, Default)]
pub struct NokhwaBackend;

impl NokhwaBackend {
    /// Creates a backend over the platform's default capture API.
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for NokhwaBackend {
    fn open_device(
        &mut self,
        index: u32,
        config: &CaptureConfig,
    ) -> Result<Box<dyn Camera>, CameraError> {
        // Devices that cannot do the exact size fall back to their nearest format
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(wanted_format(config)));
        let mut inner = nokhwa::Camera::new(CameraIndex::Index(index), requested).map_err(|e| {
            CameraError::OpenFailed {
                index,
                reason: e.to_string(),
            }
        })?;
        inner.open_stream().map_err(|e| CameraError::OpenFailed {
            index,
            reason: e.to_string(),
        })?;
        tracing::info!(
            index,
            requested = %format!("{}x{}", config.width, config.height),
            actual = %inner.resolution(),
            "Camera stream opened"
        );

        Ok(Box::new(NokhwaCamera {
            index,
            inner,
            sequence: 0,
            open: true,
        }))
    }
}

/// A streaming `nokhwa` camera.
pub struct NokhwaCamera {
    index: u32,
    inner: nokhwa::Camera,
    sequence: u64,
    open: bool,
}

impl Camera for NokhwaCamera {
    fn index(&self) -> u32 {
        self.index
    }

    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        if !self.open {
            return Err(CameraError::Closed);
        }
        let buffer = self
            .inner
            .frame()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;

        self.sequence += 1;
        let (width, height) = (decoded.width(), decoded.height());
        Ok(Frame::new(
            decoded.into_raw(),
            width,
            height,
            PixelFormat::Rgb8,
            self.sequence,
        ))
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = self.inner.stop_stream() {
            tracing::warn!(index = self.index, error = %e, "Failed to stop camera stream");
        }
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        self.close();
    }
}
