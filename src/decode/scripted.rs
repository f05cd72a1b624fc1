//! Decoder that answers from a table keyed by frame sequence number.
//!
//! Pairs with [`MockBackend`](crate::capture::MockBackend): queue a
//! frame with a known sequence number and register what the decoder
//! should "see" in it.

use super::{DecodedPayload, Decoder};
use crate::capture::Frame;
use std::collections::HashMap;

/// Table-driven decoder for tests and the headless demo.
#[derive(Debug, Default, Clone)]
pub struct ScriptedDecoder {
    codes: HashMap<u64, Vec<DecodedPayload>>,
}

impl ScriptedDecoder {
    /// Creates a decoder that sees no codes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one code visible in the frame with `sequence`.
    pub fn with_code(mut self, sequence: u64, text: impl Into<String>) -> Self {
        self.codes
            .entry(sequence)
            .or_default()
            .push(DecodedPayload::new(text));
        self
    }
}

impl Decoder for ScriptedDecoder {
    fn decode(&self, frame: &Frame) -> Vec<DecodedPayload> {
        self.codes
            .get(&frame.sequence())
            .cloned()
            .unwrap_or_default()
    }
}
