//! QR decoder backed by `rqrr`.

use super::{DecodedPayload, Decoder};
use crate::capture::Frame;

/// Decodes QR codes over the full frame.
///
/// Grids that are detected but fail to decode (damaged, partially
/// visible, non-UTF-8 payload) are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrDecoder;

impl QrDecoder {
    /// Creates a decoder.
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for QrDecoder {
    fn decode(&self, frame: &Frame) -> Vec<DecodedPayload> {
        let Some(gray) = frame.to_luma_image() else {
            tracing::trace!(sequence = frame.sequence(), "Frame not decodable");
            return Vec::new();
        };

        let (width, height) = (gray.width() as usize, gray.height() as usize);
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| {
            gray.get_pixel(x as u32, y as u32)[0]
        });

        prepared
            .detect_grids()
            .into_iter()
            .filter_map(|grid| match grid.decode() {
                Ok((_meta, content)) => Some(DecodedPayload::new(content)),
                Err(e) => {
                    tracing::debug!(error = ?e, "QR grid found but not decodable");
                    None
                }
            })
            .collect()
    }
}
