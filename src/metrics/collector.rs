//! Metrics collection and registry.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

use crate::capture::CameraBackend;
use crate::card::{AuthCard, CardStats, Mode, Verifier};
use crate::decode::Decoder;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of card state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Whether the card is in QR mode.
    pub scanning: bool,
    /// Whether a camera handle is open.
    pub camera_open: bool,
    /// Running counters.
    pub stats: CardStats,
}

impl MetricsSnapshot {
    /// Captures the current state of a card.
    pub fn from_card<B, D, V>(card: &AuthCard<B, D, V>) -> Self
    where
        B: CameraBackend,
        D: Decoder,
        V: Verifier,
    {
        Self {
            scanning: card.mode() == Mode::QrScan,
            camera_open: card.camera_open(),
            stats: card.stats().clone(),
        }
    }
}

/// Prometheus metrics registry for the card.
pub struct MetricsRegistry {
    registry: Registry,

    // State gauges
    scanning: IntGauge,
    camera_open: IntGauge,

    // Frame path
    ticks_total: IntCounter,
    frames_displayed_total: IntCounter,
    frames_skipped_total: IntCounter,
    decodes_total: IntCounter,

    // Camera lifecycle
    probe_failures_total: IntCounter,
    camera_opens_total: IntCounter,
    camera_releases_total: IntCounter,

    // Authentication
    auth_accepted_total: IntCounter,
    auth_rejected_total: IntCounter,
    auth_empty_total: IntCounter,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all card metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let scanning = IntGauge::new(
            "qr_auth_card_scanning",
            "Current mode (1=QR scan, 0=password)",
        )?;
        let camera_open = IntGauge::new(
            "qr_auth_card_camera_open",
            "Whether a camera device is currently open",
        )?;

        let ticks_total = IntCounter::new(
            "qr_auth_card_ticks_total",
            "Frame ticks processed while scanning",
        )?;
        let frames_displayed_total = IntCounter::new(
            "qr_auth_card_frames_displayed_total",
            "Viewfinder images produced",
        )?;
        let frames_skipped_total = IntCounter::new(
            "qr_auth_card_frames_skipped_total",
            "Ticks skipped after a failed read or unusable frame",
        )?;
        let decodes_total = IntCounter::new(
            "qr_auth_card_decodes_total",
            "QR codes decoded",
        )?;

        let probe_failures_total = IntCounter::new(
            "qr_auth_card_probe_failures_total",
            "QR mode entries where no camera device opened",
        )?;
        let camera_opens_total = IntCounter::new(
            "qr_auth_card_camera_opens_total",
            "Camera devices opened",
        )?;
        let camera_releases_total = IntCounter::new(
            "qr_auth_card_camera_releases_total",
            "Camera devices released",
        )?;

        let auth_accepted_total = IntCounter::new(
            "qr_auth_card_auth_accepted_total",
            "Credentials accepted by verification",
        )?;
        let auth_rejected_total = IntCounter::new(
            "qr_auth_card_auth_rejected_total",
            "Credentials rejected by verification",
        )?;
        let auth_empty_total = IntCounter::new(
            "qr_auth_card_auth_empty_total",
            "Empty credential submissions",
        )?;

        registry.register(Box::new(scanning.clone()))?;
        registry.register(Box::new(camera_open.clone()))?;
        registry.register(Box::new(ticks_total.clone()))?;
        registry.register(Box::new(frames_displayed_total.clone()))?;
        registry.register(Box::new(frames_skipped_total.clone()))?;
        registry.register(Box::new(decodes_total.clone()))?;
        registry.register(Box::new(probe_failures_total.clone()))?;
        registry.register(Box::new(camera_opens_total.clone()))?;
        registry.register(Box::new(camera_releases_total.clone()))?;
        registry.register(Box::new(auth_accepted_total.clone()))?;
        registry.register(Box::new(auth_rejected_total.clone()))?;
        registry.register(Box::new(auth_empty_total.clone()))?;

        Ok(Self {
            registry,
            scanning,
            camera_open,
            ticks_total,
            frames_displayed_total,
            frames_skipped_total,
            decodes_total,
            probe_failures_total,
            camera_opens_total,
            camera_releases_total,
            auth_accepted_total,
            auth_rejected_total,
            auth_empty_total,
        })
    }

    /// Updates all metrics from a snapshot of card state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.scanning.set(i64::from(snapshot.scanning));
        self.camera_open.set(i64::from(snapshot.camera_open));

        let stats = &snapshot.stats;
        // Counters only move forward; apply the difference
        advance(&self.ticks_total, stats.ticks);
        advance(&self.frames_displayed_total, stats.frames_displayed);
        advance(&self.frames_skipped_total, stats.frames_skipped);
        advance(&self.decodes_total, stats.decodes);
        advance(&self.probe_failures_total, stats.probe_failures);
        advance(&self.camera_opens_total, stats.camera_opens);
        advance(&self.camera_releases_total, stats.camera_releases);
        advance(&self.auth_accepted_total, stats.accepted);
        advance(&self.auth_rejected_total, stats.rejected);
        advance(&self.auth_empty_total, stats.empty);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}
