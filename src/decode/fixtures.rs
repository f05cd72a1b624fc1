//! Renders real QR codes into frames for decoder tests.

use crate::capture::{Frame, PixelFormat};
use qrcode::{Color, QrCode};

/// Modules of white border around each painted code.
const QUIET_ZONE: usize = 4;

/// Width in pixels a code for `text` occupies at `scale`, border included.
pub(crate) fn code_extent(text: &str, scale: usize) -> usize {
    let code = QrCode::new(text.as_bytes()).expect("encodable payload");
    (code.width() + 2 * QUIET_ZONE) * scale
}

/// Paints `text` as a QR code into a BGR buffer with its top-left
/// corner (border included) at `origin`.
pub(crate) fn paint_code(
    pixels: &mut [u8],
    frame_width: usize,
    text: &str,
    origin: (usize, usize),
    scale: usize,
) {
    let code = QrCode::new(text.as_bytes()).expect("encodable payload");
    let modules = code.width();
    let colors = code.to_colors();

    for (i, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let (mx, my) = (i % modules + QUIET_ZONE, i / modules + QUIET_ZONE);
        for dy in 0..scale {
            for dx in 0..scale {
                let x = origin.0 + mx * scale + dx;
                let y = origin.1 + my * scale + dy;
                let offset = (y * frame_width + x) * 3;
                pixels[offset..offset + 3].fill(0);
            }
        }
    }
}

/// A white BGR frame with one code for `text` in its top-left corner.
pub(crate) fn code_frame(text: &str, width: u32, height: u32, scale: usize) -> Frame {
    let mut pixels = vec![255u8; (width * height * 3) as usize];
    paint_code(&mut pixels, width as usize, text, (0, 0), scale);
    Frame::new(pixels, width, height, PixelFormat::Bgr8, 1)
}
