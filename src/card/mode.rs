//! Card modes, inbound events, and the states derived from them.

use serde::{Deserialize, Serialize};

/// The two mutually exclusive authentication modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Typed password entry. Initial mode.
    Password,
    /// Camera viewfinder looking for a QR code.
    QrScan,
}

impl Mode {
    /// Stable lowercase name, used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Password => "password",
            Mode::QrScan => "qr_scan",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the card reacts to.
///
/// Button clicks and window chrome are translated into these by
/// whatever shell renders the card.
#[derive(Clone, PartialEq, Eq)]
pub enum Event {
    /// "Scan QR code" button.
    ScanRequested,
    /// "Back to password" button.
    BackRequested,
    /// Explicit submit of the credential field.
    Submit(String),
    /// Periodic frame tick.
    Tick,
    /// Window closed by the user or the process is shutting down.
    Close,
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::ScanRequested => f.write_str("ScanRequested"),
            Event::BackRequested => f.write_str("BackRequested"),
            Event::Submit(text) => f
                .debug_struct("Submit")
                .field("len", &text.len())
                .finish(),
            Event::Tick => f.write_str("Tick"),
            Event::Close => f.write_str("Close"),
        }
    }
}

/// Whether the event loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep handling events.
    Continue,
    /// The session is over; stop the loop.
    Exit,
}

impl Flow {
    /// Returns true for [`Flow::Exit`].
    pub fn is_exit(self) -> bool {
        matches!(self, Flow::Exit)
    }
}

/// Lifecycle of the authentication session the card guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Card is on screen and accepting input.
    Open,
    /// A credential was accepted; the card closed itself.
    Authenticated,
    /// The window was closed without authenticating.
    Dismissed,
}

/// What the card knows about its camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraStatus {
    /// No device held and none wanted.
    Idle,
    /// A device is open and frames are flowing.
    Streaming {
        /// Index of the open device.
        index: u32,
    },
    /// QR mode was entered but no device could be opened.
    Unavailable,
}
