//! QR payload decoding.
//!
//! Decoding is a pure function of a frame: it may find zero or more
//! codes, and callers take the first one. Nothing here checks what the
//! payload contains; it is handed on as credential text.

mod qr;
mod scripted;

#[cfg(test)]
pub(crate) mod fixtures;

pub use qr::QrDecoder;
pub use scripted::ScriptedDecoder;

use crate::capture::Frame;

/// Text extracted from one QR code in a frame.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    text: String,
}

impl DecodedPayload {
    /// Wraps decoded text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns the decoded text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the payload, returning the decoded text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Debug for DecodedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Payloads are credentials; never print them
        f.debug_struct("DecodedPayload")
            .field("len", &self.text.len())
            .finish()
    }
}

/// Finds QR codes in a frame.
pub trait Decoder {
    /// Returns every payload found, in detection order. May be empty.
    fn decode(&self, frame: &Frame) -> Vec<DecodedPayload>;
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn decode(&self, frame: &Frame) -> Vec<DecodedPayload> {
        (**self).decode(frame)
    }
}
