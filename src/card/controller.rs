//! The authentication card state machine.
//!
//! [`AuthCard`] owns the camera, the tick timer, the frame processor and
//! the dispatcher, and is the only place mode changes happen. Every
//! input arrives as an [`Event`] through [`AuthCard::handle`].
//!
//! Invariants kept here:
//! - at most one camera handle is open, and only while in QR mode;
//! - the tick timer runs iff in QR mode with an open handle;
//! - once the session is closed (accepted or dismissed) the camera is
//!   released and every later event is ignored.

use std::time::Duration;

use super::dispatch::{Credential, DispatchOutcome, Dispatcher, Verifier};
use super::mode::{CameraStatus, Event, Flow, Mode, SessionState};
use super::processor::{FrameProcessor, FrameResult};
use super::timer::TickTimer;
use super::view::CardView;
use crate::capture::{CameraBackend, CameraManager};
use crate::config::{CardConfig, LayoutConfig};
use crate::decode::Decoder;

/// Running counters for a card, exported as metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardStats {
    /// Ticks that ran while scanning.
    pub ticks: u64,
    /// Viewfinder images produced.
    pub frames_displayed: u64,
    /// Ticks skipped because a read failed or the frame was unusable.
    pub frames_skipped: u64,
    /// QR codes decoded.
    pub decodes: u64,
    /// QR mode entries where no device opened.
    pub probe_failures: u64,
    /// Devices opened.
    pub camera_opens: u64,
    /// Devices released.
    pub camera_releases: u64,
    /// Submissions accepted by the verifier.
    pub accepted: u64,
    /// Submissions rejected by the verifier.
    pub rejected: u64,
    /// Empty submissions.
    pub empty: u64,
}

/// Authentication card controller.
pub struct AuthCard<B, D, V> {
    layout: LayoutConfig,
    mode: Mode,
    session: SessionState,
    camera_status: CameraStatus,
    camera: CameraManager<B>,
    timer: TickTimer,
    processor: FrameProcessor<D>,
    dispatcher: Dispatcher<V>,
    view: CardView,
    stats: CardStats,
}

impl<B, D, V> AuthCard<B, D, V>
where
    B: CameraBackend,
    D: Decoder,
    V: Verifier,
{
    /// Creates a card in password mode with no camera open.
    pub fn new(config: &CardConfig, backend: B, decoder: D, verifier: V) -> Self {
        let layout = config.layout.clone();
        let mut card = Self {
            view: CardView::new(layout.password),
            processor: FrameProcessor::new(decoder, layout.viewfinder),
            camera: CameraManager::new(backend, config.capture.clone()),
            timer: TickTimer::new(config.capture.tick_interval()),
            dispatcher: Dispatcher::new(verifier),
            layout,
            mode: Mode::Password,
            session: SessionState::Open,
            camera_status: CameraStatus::Idle,
            stats: CardStats::default(),
        };
        card.enter_password();
        card
    }

    /// Applies one event.
    ///
    /// Returns [`Flow::Exit`] once the session is closed, either by an
    /// accepted credential or by [`Event::Close`].
    pub fn handle(&mut self, event: Event) -> Flow {
        if self.session != SessionState::Open {
            tracing::debug!(?event, session = ?self.session, "Event after session closed, ignored");
            return Flow::Exit;
        }

        match event {
            Event::ScanRequested => {
                self.enter_qr_scan();
                Flow::Continue
            }
            Event::BackRequested => {
                self.enter_password();
                Flow::Continue
            }
            Event::Submit(text) => {
                if self.mode == Mode::QrScan {
                    tracing::debug!("Submit while scanning, ignored");
                    return Flow::Continue;
                }
                self.submit(Credential::from(text))
            }
            Event::Tick => self.tick(),
            Event::Close => {
                self.close();
                Flow::Exit
            }
        }
    }

    /// Switches to password mode, releasing the camera if held.
    pub fn enter_password(&mut self) {
        self.release_resources();
        self.view.camera_idle();
        self.view.resize(self.layout.password);
        self.view.set_focus(true);
        if self.mode != Mode::Password {
            tracing::info!(from = %self.mode, to = %Mode::Password, "Mode transition");
        }
        self.mode = Mode::Password;
    }

    /// Switches to QR mode, acquiring a camera if none is held.
    ///
    /// Re-entering while a healthy handle is held only resizes: the
    /// device is not reopened and the timer is not restarted. When no
    /// device opens the card stays in QR mode with an error shown and
    /// no timer running.
    pub fn enter_qr_scan(&mut self) {
        if self.session != SessionState::Open {
            return;
        }
        self.view.resize(self.layout.qr);
        self.view.set_focus(false);
        if self.mode != Mode::QrScan {
            tracing::info!(from = %self.mode, to = %Mode::QrScan, "Mode transition");
        }
        self.mode = Mode::QrScan;

        if !self.camera.is_open() {
            self.view.camera_starting();
            match self.camera.acquire() {
                Ok(index) => {
                    self.stats.camera_opens += 1;
                    self.camera_status = CameraStatus::Streaming { index };
                }
                Err(e) => {
                    tracing::warn!(error = %e, "QR scanning unavailable");
                    self.stats.probe_failures += 1;
                    self.camera_status = CameraStatus::Unavailable;
                    self.view.camera_unavailable();
                    self.timer.stop();
                    return;
                }
            }
        }

        self.timer.start();
    }

    /// Runs one frame tick. A no-op unless scanning with an open camera.
    pub fn tick(&mut self) -> Flow {
        if self.mode != Mode::QrScan || !self.timer.is_running() {
            return Flow::Continue;
        }
        let Some(handle) = self.camera.handle_mut() else {
            return Flow::Continue;
        };
        self.stats.ticks += 1;

        match self.processor.process(handle) {
            FrameResult::Skipped => {
                self.stats.frames_skipped += 1;
                Flow::Continue
            }
            FrameResult::Display(image) => {
                self.stats.frames_displayed += 1;
                self.view.show_frame(image);
                Flow::Continue
            }
            FrameResult::Decoded(text) => {
                self.stats.decodes += 1;
                self.enter_password();
                self.submit(Credential::from(text))
            }
        }
    }

    /// Submits a credential as if the user pressed the submit button.
    pub fn submit(&mut self, credential: Credential) -> Flow {
        if self.session != SessionState::Open {
            return Flow::Exit;
        }
        self.view.set_credential_len(credential.len());

        match self.dispatcher.submit(&credential) {
            DispatchOutcome::Empty => {
                self.stats.empty += 1;
                self.view.shake();
                Flow::Continue
            }
            DispatchOutcome::Rejected => {
                self.stats.rejected += 1;
                self.view.shake();
                Flow::Continue
            }
            DispatchOutcome::Accepted => {
                self.stats.accepted += 1;
                self.release_resources();
                self.session = SessionState::Authenticated;
                tracing::info!("Session closed after successful authentication");
                Flow::Exit
            }
            DispatchOutcome::Ignored => Flow::Exit,
        }
    }

    /// Window close: releases the camera and stops ticking, with no
    /// visual transition.
    pub fn close(&mut self) {
        self.release_resources();
        if self.session == SessionState::Open {
            self.session = SessionState::Dismissed;
            tracing::info!(mode = %self.mode, "Card dismissed");
        }
    }

    fn release_resources(&mut self) {
        self.timer.stop();
        if self.camera.release() {
            self.stats.camera_releases += 1;
        }
        self.camera_status = CameraStatus::Idle;
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current session state.
    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Explicit camera status.
    pub fn camera_status(&self) -> CameraStatus {
        self.camera_status
    }

    /// Returns true while a camera handle is open.
    pub fn camera_open(&self) -> bool {
        self.camera.is_open()
    }

    /// The camera manager, for inspection.
    pub fn camera(&self) -> &CameraManager<B> {
        &self.camera
    }

    /// The tick timer state.
    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    /// Tick period.
    pub fn tick_interval(&self) -> Duration {
        self.timer.period()
    }

    /// Presentation state.
    pub fn view(&self) -> &CardView {
        &self.view
    }

    /// Running counters.
    pub fn stats(&self) -> &CardStats {
        &self.stats
    }

    /// The verification backend.
    pub fn verifier(&self) -> &V {
        self.dispatcher.verifier()
    }
}
