//! Per-tick frame handling.
//!
//! One tick reads one frame, tries to decode it, and mirrors it for the
//! viewfinder. The decoder sees the frame as captured first, since a
//! printed code only reads the right way round, and the mirrored view
//! second. A decoded payload short-circuits display: the tick either
//! produces a credential or a viewfinder image, never both.

use image::RgbImage;

use crate::capture::{CameraHandle, Frame};
use crate::config::Size;
use crate::decode::Decoder;

/// Result of processing one tick.
#[derive(Debug)]
pub enum FrameResult {
    /// Read failed or the frame was unusable. Nothing changes.
    Skipped,
    /// No code in view; show this image.
    Display(RgbImage),
    /// First payload found in the frame.
    Decoded(String),
}

/// Reads, mirrors, decodes, and renders frames.
#[derive(Debug)]
pub struct FrameProcessor<D> {
    decoder: D,
    viewfinder: Size,
}

impl<D: Decoder> FrameProcessor<D> {
    /// Creates a processor scaling display images into `viewfinder`.
    pub fn new(decoder: D, viewfinder: Size) -> Self {
        Self {
            decoder,
            viewfinder,
        }
    }

    /// Processes a single frame from `camera`.
    ///
    /// Read failures are treated as transient and skipped silently;
    /// the next tick simply tries again.
    pub fn process(&self, camera: &mut CameraHandle) -> FrameResult {
        let mut frame = match camera.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(index = camera.index(), error = %e, "Frame read failed, skipping tick");
                return FrameResult::Skipped;
            }
        };

        // First match wins, captured orientation before mirrored
        if let Some(text) = self.first_payload(&frame) {
            return FrameResult::Decoded(text);
        }
        frame.mirror();
        if let Some(text) = self.first_payload(&frame) {
            return FrameResult::Decoded(text);
        }

        match frame.to_display(self.viewfinder) {
            Some(image) => FrameResult::Display(image),
            None => {
                tracing::debug!(?frame, "Frame buffer does not match its dimensions");
                FrameResult::Skipped
            }
        }
    }

    fn first_payload(&self, frame: &Frame) -> Option<String> {
        let payload = self.decoder.decode(frame).into_iter().next()?;
        tracing::info!(sequence = frame.sequence(), "QR code decoded");
        Some(payload.into_text())
    }
}
