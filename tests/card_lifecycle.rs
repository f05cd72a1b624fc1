//! End-to-end behaviour of the card against a scripted camera.

use qr_auth_card::capture::{Frame, MockBackend, PixelFormat};
use qr_auth_card::card::{
    AuthCard, CameraStatus, Credential, Event, Flow, Mode, SessionState, StubVerifier, Verdict,
    Verifier, CAMERA_NOT_FOUND,
};
use qr_auth_card::config::CardConfig;
use qr_auth_card::decode::{QrDecoder, ScriptedDecoder};
use qrcode::{Color, QrCode};

fn config() -> CardConfig {
    let mut config = CardConfig::default();
    config.capture.width = 64;
    config.capture.height = 48;
    config
}

/// A white BGR frame showing a QR code for `text`, as a camera sees it.
fn printed_code(text: &str, sequence: u64) -> Frame {
    const SCALE: usize = 3;
    const BORDER: usize = 4;
    let code = QrCode::new(text.as_bytes()).expect("encodable payload");
    let modules = code.width();
    let side = (modules + 2 * BORDER) * SCALE;

    let mut pixels = vec![255u8; side * side * 3];
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let (mx, my) = (i % modules + BORDER, i / modules + BORDER);
        for y in my * SCALE..(my + 1) * SCALE {
            for x in mx * SCALE..(mx + 1) * SCALE {
                let offset = (y * side + x) * 3;
                pixels[offset..offset + 3].fill(0);
            }
        }
    }
    Frame::new(pixels, side as u32, side as u32, PixelFormat::Bgr8, sequence)
}

/// Verifier that counts calls and never accepts.
#[derive(Default)]
struct CountingVerifier {
    calls: usize,
}

impl Verifier for CountingVerifier {
    fn verify(&mut self, _credential: &Credential) -> Verdict {
        self.calls += 1;
        Verdict::Rejected
    }
}

#[test]
fn rescan_with_healthy_handle_opens_device_once() {
    let backend = MockBackend::new();
    let mut card = AuthCard::new(&config(), backend.clone(), ScriptedDecoder::new(), StubVerifier::new());

    card.handle(Event::ScanRequested);
    card.handle(Event::Tick);
    card.handle(Event::ScanRequested);

    assert_eq!(backend.total_opens(), 1);
    assert_eq!(backend.open_devices(), 1);
    assert_eq!(card.timer().starts(), 1);
    assert!(card.timer().is_running());
}

#[test]
fn probing_failure_leaves_qr_mode_without_timer() {
    let backend = MockBackend::without_devices();
    let mut card = AuthCard::new(&config(), backend.clone(), ScriptedDecoder::new(), StubVerifier::new());

    card.handle(Event::ScanRequested);

    assert_eq!(card.mode(), Mode::QrScan);
    assert!(!card.timer().is_running());
    assert_eq!(card.view().error_text(), Some(CAMERA_NOT_FOUND));
    assert_eq!(card.camera_status(), CameraStatus::Unavailable);
    assert_eq!(backend.probed(), vec![0, 1, 2, 3]);
    assert_eq!(card.stats().probe_failures, 1);
}

#[test]
fn decoded_payload_is_dispatched() {
    let backend = MockBackend::new();
    backend.push_frame(Frame::new(vec![0u8; 64 * 48 * 3], 64, 48, PixelFormat::Bgr8, 500));
    let decoder = ScriptedDecoder::new().with_code(500, "secret123");
    let mut card = AuthCard::new(&config(), backend.clone(), decoder, CountingVerifier::default());

    card.handle(Event::ScanRequested);
    let flow = card.handle(Event::Tick);

    // Rejected so the card stays open and we can inspect it
    assert_eq!(flow, Flow::Continue);
    assert_eq!(card.mode(), Mode::Password);
    assert_eq!(card.verifier().calls, 1);
    assert_eq!(card.view().credential_len(), "secret123".len());
    assert_eq!(card.view().feedback_pulses(), 1);
    assert!(card.view().display_image().is_none());
    assert_eq!(backend.open_devices(), 0);
    assert!(!card.timer().is_running());
}

#[test]
fn printed_code_in_front_of_camera_is_dispatched() {
    let backend = MockBackend::new();
    let mut card = AuthCard::new(&config(), backend.clone(), QrDecoder::new(), CountingVerifier::default());

    card.handle(Event::ScanRequested);
    card.handle(Event::Tick);
    assert_eq!(card.mode(), Mode::QrScan);

    backend.push_frame(printed_code("secret123", 2));
    card.handle(Event::Tick);

    assert_eq!(card.mode(), Mode::Password);
    assert_eq!(card.verifier().calls, 1);
    assert_eq!(card.view().credential_len(), "secret123".len());
    assert_eq!(card.stats().decodes, 1);
    assert_eq!(backend.open_devices(), 0);
}

#[test]
fn back_after_missing_camera_clears_error() {
    let mut card = AuthCard::new(
        &config(),
        MockBackend::without_devices(),
        ScriptedDecoder::new(),
        StubVerifier::new(),
    );

    card.handle(Event::ScanRequested);
    assert_eq!(card.view().error_text(), Some(CAMERA_NOT_FOUND));

    card.handle(Event::BackRequested);
    assert_eq!(card.mode(), Mode::Password);
    assert_eq!(card.view().error_text(), None);
    assert_eq!(card.view().status_text(), None);

    card.handle(Event::Submit("pw".to_string()));
    assert_eq!(card.view().error_text(), None);
}

#[test]
fn decoded_payload_with_stub_closes_session() {
    let backend = MockBackend::new();
    let decoder = ScriptedDecoder::new().with_code(1, "secret123");
    let mut card = AuthCard::new(&config(), backend.clone(), decoder, StubVerifier::new());

    card.handle(Event::ScanRequested);
    assert_eq!(card.handle(Event::Tick), Flow::Exit);

    assert_eq!(card.session(), SessionState::Authenticated);
    assert_eq!(card.mode(), Mode::Password);
    let attempts = card.verifier().attempts();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].length, 9);
    assert_eq!(attempts[0].verdict, Verdict::Accepted);
}

#[test]
fn frame_without_code_shows_viewfinder() {
    let mut card = AuthCard::new(&config(), MockBackend::new(), ScriptedDecoder::new(), CountingVerifier::default());

    card.handle(Event::ScanRequested);
    card.handle(Event::Tick);

    let image = card.view().display_image().expect("display image");
    assert!(image.width() > 0 && image.height() > 0);
    assert!(image.width() <= 370 && image.height() <= 290);
    assert_eq!(card.verifier().calls, 0);
    assert_eq!(card.mode(), Mode::QrScan);
}

#[test]
fn empty_credential_never_verifies_or_closes() {
    let mut card = AuthCard::new(&config(), MockBackend::new(), ScriptedDecoder::new(), CountingVerifier::default());

    for _ in 0..3 {
        assert_eq!(card.handle(Event::Submit(String::new())), Flow::Continue);
    }

    assert_eq!(card.session(), SessionState::Open);
    assert_eq!(card.verifier().calls, 0);
    assert_eq!(card.view().feedback_pulses(), 3);
    assert_eq!(card.stats().empty, 3);
}

#[test]
fn empty_decoded_payload_is_a_validation_failure() {
    let decoder = ScriptedDecoder::new().with_code(1, "");
    let mut card = AuthCard::new(&config(), MockBackend::new(), decoder, StubVerifier::new());

    card.handle(Event::ScanRequested);
    assert_eq!(card.handle(Event::Tick), Flow::Continue);

    assert_eq!(card.mode(), Mode::Password);
    assert_eq!(card.session(), SessionState::Open);
    assert!(card.verifier().attempts().is_empty());
    assert_eq!(card.view().feedback_pulses(), 1);
}

#[test]
fn close_while_scanning_releases_camera() {
    let backend = MockBackend::new();
    let mut card = AuthCard::new(&config(), backend.clone(), ScriptedDecoder::new(), StubVerifier::new());

    card.handle(Event::ScanRequested);
    card.handle(Event::Tick);
    assert_eq!(backend.open_devices(), 1);

    assert_eq!(card.handle(Event::Close), Flow::Exit);
    assert_eq!(backend.open_devices(), 0);
    assert!(!card.timer().is_running());
    assert_eq!(card.session(), SessionState::Dismissed);
    // No visual transition on close
    assert_eq!(card.mode(), Mode::QrScan);
}

#[test]
fn dropping_card_releases_camera() {
    let backend = MockBackend::new();
    {
        let mut card = AuthCard::new(&config(), backend.clone(), ScriptedDecoder::new(), StubVerifier::new());
        card.handle(Event::ScanRequested);
        assert_eq!(backend.open_devices(), 1);
    }
    assert_eq!(backend.open_devices(), 0);
}

#[test]
fn scan_back_scan_reopens_same_device() {
    let backend = MockBackend::with_devices(&[1]);
    let mut card = AuthCard::new(&config(), backend.clone(), ScriptedDecoder::new(), StubVerifier::new());

    card.handle(Event::ScanRequested);
    assert_eq!(card.camera_status(), CameraStatus::Streaming { index: 1 });
    card.handle(Event::BackRequested);
    card.handle(Event::ScanRequested);

    assert_eq!(card.camera_status(), CameraStatus::Streaming { index: 1 });
    assert_eq!(backend.total_opens(), 2);
    assert_eq!(backend.open_devices(), 1);
    assert_eq!(card.stats().camera_releases, 1);
}

#[test]
fn transient_read_failures_are_silent() {
    let backend = MockBackend::new();
    let mut card = AuthCard::new(&config(), backend.clone(), ScriptedDecoder::new(), StubVerifier::new());

    card.handle(Event::ScanRequested);
    backend.push_read_failure();
    backend.push_read_failure();

    card.handle(Event::Tick);
    card.handle(Event::Tick);
    assert_eq!(card.mode(), Mode::QrScan);
    assert!(card.view().display_image().is_none());
    assert_eq!(card.view().error_text(), None);
    assert_eq!(card.stats().frames_skipped, 2);

    card.handle(Event::Tick);
    assert!(card.view().display_image().is_some());
}

#[test]
fn ticks_in_password_mode_do_nothing() {
    let backend = MockBackend::new();
    let mut card = AuthCard::new(&config(), backend.clone(), ScriptedDecoder::new(), StubVerifier::new());

    card.handle(Event::Tick);
    assert_eq!(backend.total_reads(), 0);
    assert_eq!(card.stats().ticks, 0);
}
