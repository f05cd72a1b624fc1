//! Single-threaded cooperative event loop.
//!
//! Shell events arrive on a channel; frame ticks are generated locally
//! from the card's timer. Both are handled on the calling thread, one at
//! a time, so a slow frame read delays everything behind it. That is
//! why the tick period has to stay above the worst read+decode latency.

use std::sync::mpsc::{Receiver, RecvTimeoutError};

use super::{Clock, Scheduler, SystemClock};
use crate::capture::CameraBackend;
use crate::card::{AuthCard, Event, Flow, SessionState, Verifier};
use crate::decode::Decoder;

/// Drives an [`AuthCard`] from a channel of events.
pub struct EventLoop<C = SystemClock> {
    events: Receiver<Event>,
    scheduler: Scheduler<C>,
}

impl EventLoop<SystemClock> {
    /// Creates a loop on the wall clock.
    pub fn new(events: Receiver<Event>) -> Self {
        Self::with_clock(events, SystemClock)
    }
}

impl<C: Clock> EventLoop<C> {
    /// Creates a loop on a custom clock.
    pub fn with_clock(events: Receiver<Event>, clock: C) -> Self {
        Self {
            events,
            scheduler: Scheduler::new(clock),
        }
    }

    /// Runs until the session closes.
    ///
    /// A disconnected channel counts as a window close. The camera is
    /// released before this returns.
    pub fn run<B, D, V>(&mut self, card: &mut AuthCard<B, D, V>) -> SessionState
    where
        B: CameraBackend,
        D: Decoder,
        V: Verifier,
    {
        self.run_observed(card, |_| {})
    }

    /// Like [`run`](Self::run), calling `observe` after every handled
    /// event and tick.
    pub fn run_observed<B, D, V, F>(
        &mut self,
        card: &mut AuthCard<B, D, V>,
        mut observe: F,
    ) -> SessionState
    where
        B: CameraBackend,
        D: Decoder,
        V: Verifier,
        F: FnMut(&AuthCard<B, D, V>),
    {
        tracing::debug!("Event loop started");
        loop {
            self.scheduler.sync(card.timer());

            let event = match self.scheduler.wait_time() {
                Some(wait) => match self.events.recv_timeout(wait) {
                    Ok(event) => Some(event),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => Some(Event::Close),
                },
                None => Some(self.events.recv().unwrap_or(Event::Close)),
            };

            if let Some(event) = event {
                let flow = card.handle(event);
                observe(card);
                if flow.is_exit() {
                    break;
                }
            }

            // Checked after every wakeup so a busy event stream cannot starve ticks
            if self.scheduler.poll(card.timer()) {
                let flow = card.handle(Event::Tick);
                observe(card);
                if flow == Flow::Exit {
                    break;
                }
            }
        }

        // Normally already done by the card; covers exits by other paths
        card.close();
        tracing::debug!(session = ?card.session(), "Event loop finished");
        card.session()
    }
}
