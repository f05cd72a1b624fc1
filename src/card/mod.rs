//! The authentication card: mode state machine, frame processing, and
//! credential dispatch.
//!
//! # Data flow
//!
//! ```text
//! shell events ──► AuthCard ──► CameraManager (acquire / release)
//!                     │
//!        tick ──► FrameProcessor ──► display image ──► CardView
//!                     │
//!                     └── decoded text ──► Dispatcher ──► Verifier
//! ```

mod controller;
mod dispatch;
mod mode;
mod processor;
mod timer;
mod view;

pub use controller::{AuthCard, CardStats};
pub use dispatch::{
    AttemptRecord, Credential, DispatchOutcome, Dispatcher, StubVerifier, Verdict, Verifier,
};
pub use mode::{CameraStatus, Event, Flow, Mode, SessionState};
pub use processor::{FrameProcessor, FrameResult};
pub use timer::TickTimer;
pub use view::{CardView, CAMERA_NOT_FOUND, CAMERA_STARTING};
