//! Prometheus metrics exporter for the authentication card.
//!
//! # Metrics Exposed
//!
//! ## State
//! - `qr_auth_card_scanning` - Current mode (1=QR scan, 0=password)
//! - `qr_auth_card_camera_open` - Whether a camera device is open
//!
//! ## Frame Path
//! - `qr_auth_card_ticks_total` - Frame ticks processed
//! - `qr_auth_card_frames_displayed_total` - Viewfinder images produced
//! - `qr_auth_card_frames_skipped_total` - Ticks skipped on read failure
//! - `qr_auth_card_decodes_total` - QR codes decoded
//!
//! ## Camera Lifecycle
//! - `qr_auth_card_probe_failures_total` - Probes that found no device
//! - `qr_auth_card_camera_opens_total` / `qr_auth_card_camera_releases_total`
//!
//! ## Authentication
//! - `qr_auth_card_auth_accepted_total`, `qr_auth_card_auth_rejected_total`,
//!   `qr_auth_card_auth_empty_total`
//!
//! # Example
//!
//! ```no_run
//! use qr_auth_card::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.update(&MetricsSnapshot::default());
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, MetricsState, ServerError};
