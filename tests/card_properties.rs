//! Property tests over arbitrary event sequences.

use proptest::prelude::*;
use qr_auth_card::capture::MockBackend;
use qr_auth_card::card::{AuthCard, Event, Mode, SessionState, StubVerifier, Verdict};
use qr_auth_card::config::CardConfig;
use qr_auth_card::decode::ScriptedDecoder;

fn event_strategy() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => Just(Event::ScanRequested),
        3 => Just(Event::BackRequested),
        6 => Just(Event::Tick),
        2 => "[a-z]{0,6}".prop_map(Event::Submit),
        1 => Just(Event::Close),
    ]
}

fn small_config() -> CardConfig {
    let mut config = CardConfig::default();
    config.capture.width = 16;
    config.capture.height = 12;
    config
}

proptest! {
    #[test]
    fn at_most_one_camera_open(
        events in prop::collection::vec(event_strategy(), 1..60),
        devices in prop::collection::btree_set(0u32..6, 0..3),
        decode_at in prop::option::of(1u64..20),
        accept in any::<bool>(),
    ) {
        let devices: Vec<u32> = devices.into_iter().collect();
        let backend = MockBackend::with_devices(&devices);
        let decoder = match decode_at {
            Some(sequence) => ScriptedDecoder::new().with_code(sequence, "qr-secret"),
            None => ScriptedDecoder::new(),
        };
        let verdict = if accept { Verdict::Accepted } else { Verdict::Rejected };
        let mut card = AuthCard::new(
            &small_config(),
            backend.clone(),
            decoder,
            StubVerifier::with_verdict(verdict),
        );

        for event in events {
            card.handle(event);

            prop_assert!(backend.open_devices() <= 1);
            prop_assert_eq!(backend.open_devices() == 1, card.camera_open());
            if card.camera_open() {
                prop_assert_eq!(card.mode(), Mode::QrScan);
            }
            prop_assert_eq!(
                card.timer().is_running(),
                card.mode() == Mode::QrScan && card.camera_open()
            );
            if card.session() != SessionState::Open {
                prop_assert!(!card.camera_open());
            }
        }

        drop(card);
        prop_assert_eq!(backend.open_devices(), 0);
    }

    #[test]
    fn empty_submissions_never_reach_verifier(count in 1usize..20) {
        let mut card = AuthCard::new(
            &small_config(),
            MockBackend::new(),
            ScriptedDecoder::new(),
            StubVerifier::new(),
        );
        for _ in 0..count {
            card.handle(Event::Submit(String::new()));
        }
        prop_assert!(card.verifier().attempts().is_empty());
        prop_assert_eq!(card.session(), SessionState::Open);
        prop_assert_eq!(card.view().feedback_pulses(), count as u64);
    }
}
