//! QR Authentication Card
//!
//! The controller behind a small authentication overlay: the user
//! unlocks a session either by typing a password or by holding a QR
//! code up to a camera.
//!
//! # Architecture
//!
//! ```text
//! shell events ─► runtime::EventLoop ─► card::AuthCard
//!                                          │
//!                 capture (probe / read / release)
//!                 decode  (QR payloads)
//!                 dispatch (verify credential)
//! ```
//!
//! # Design Principles
//!
//! - **Explicit resource ownership**: the card owns at most one open
//!   camera, and only while in QR mode
//! - **Fail to a displayable state**: a missing camera or a bad frame
//!   never ends the process
//! - **Toolkit independent**: every input is an [`Event`], every output
//!   is read from [`CardView`]
//! - **No credential logging**: only lengths are ever recorded
//!
//! # Example
//!
//! ```no_run
//! use qr_auth_card::{
//!     capture::MockBackend,
//!     card::{AuthCard, Event, Mode, StubVerifier},
//!     config::CardConfig,
//!     decode::QrDecoder,
//! };
//!
//! let config = CardConfig::default();
//! let mut card = AuthCard::new(&config, MockBackend::new(), QrDecoder::new(), StubVerifier::new());
//!
//! card.handle(Event::ScanRequested);
//! assert_eq!(card.mode(), Mode::QrScan);
//!
//! // One tick: read, mirror, decode or display
//! card.handle(Event::Tick);
//!
//! card.handle(Event::Close);
//! assert!(!card.camera_open());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod card;
pub mod config;
pub mod decode;
pub mod metrics;
pub mod runtime;

// Re-export commonly used types at crate root
pub use capture::{Camera, CameraBackend, CameraError, CameraManager, Frame, MockBackend};
pub use card::{AuthCard, CardView, Event, Flow, Mode, SessionState, StubVerifier, Verdict, Verifier};
pub use config::CardConfig;
pub use decode::{Decoder, QrDecoder};
pub use runtime::EventLoop;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
