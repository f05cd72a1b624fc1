//! Frame type representing a single captured image.

use image::{imageops::FilterType, DynamicImage, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::Size;

/// Byte layout of the pixels in a [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Three bytes per pixel, blue first (what most V4L/OpenCV style devices hand out).
    Bgr8,
    /// Three bytes per pixel, red first.
    Rgb8,
    /// One byte per pixel.
    Luma8,
}

impl PixelFormat {
    /// Bytes per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Bgr8 | PixelFormat::Rgb8 => 3,
            PixelFormat::Luma8 => 1,
        }
    }
}

/// A single captured frame from the camera.
///
/// Frames live for one tick only: they are read, mirrored, decoded
/// or turned into a display image, and then dropped.
#[derive(Clone)]
pub struct Frame {
    /// Raw pixel data, row-major, laid out per `format`.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Pixel layout.
    format: PixelFormat,
    /// Capture timestamp.
    timestamp: Instant,
    /// Monotonic sequence number assigned by the device.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, format: PixelFormat, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            format,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel layout.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Validates that the pixel buffer size matches dimensions and format.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == self.pixel_count() * self.format.channels()
    }

    /// Flips the frame horizontally in place.
    ///
    /// User-facing cameras deliver a mirrored picture; flipping it makes
    /// the viewfinder move the way the user expects.
    pub fn mirror(&mut self) {
        if !self.is_valid() {
            return;
        }
        let channels = self.format.channels();
        let width = self.width as usize;
        for row in self.pixels.chunks_exact_mut(width * channels) {
            for x in 0..width / 2 {
                let left = x * channels;
                let right = (width - 1 - x) * channels;
                for c in 0..channels {
                    row.swap(left + c, right + c);
                }
            }
        }
    }

    /// Converts the frame to an RGB image, undoing BGR ordering.
    ///
    /// Returns `None` when the buffer does not match the dimensions.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        if !self.is_valid() {
            return None;
        }
        let rgb = match self.format {
            PixelFormat::Rgb8 => self.pixels.clone(),
            PixelFormat::Bgr8 => self
                .pixels
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect(),
            PixelFormat::Luma8 => self.pixels.iter().flat_map(|&v| [v, v, v]).collect(),
        };
        RgbImage::from_raw(self.width, self.height, rgb)
    }

    /// Converts the frame to an 8-bit greyscale image for decoding.
    pub fn to_luma_image(&self) -> Option<GrayImage> {
        if !self.is_valid() {
            return None;
        }
        match self.format {
            PixelFormat::Luma8 => GrayImage::from_raw(self.width, self.height, self.pixels.clone()),
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => {
                self.to_rgb_image().map(|rgb| image::imageops::grayscale(&rgb))
            }
        }
    }

    /// Produces a display-ready RGB image scaled to fit `bounds`.
    ///
    /// The aspect ratio is preserved, so one side may come out shorter
    /// than the bounds.
    pub fn to_display(&self, bounds: Size) -> Option<RgbImage> {
        let rgb = self.to_rgb_image()?;
        if bounds.width == 0 || bounds.height == 0 {
            return None;
        }
        let scaled = DynamicImage::ImageRgb8(rgb).resize(
            bounds.width,
            bounds.height,
            FilterType::Triangle,
        );
        Some(scaled.into_rgb8())
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}
