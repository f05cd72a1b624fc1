//! Deadlines for the periodic frame tick.
//!
//! The scheduler follows the card's [`TickTimer`]: while it runs, a
//! deadline is kept one period ahead; when it stops, the deadline is
//! dropped. A tick that fires late is not caught up; the next deadline
//! is measured from when the tick actually fired, so slow frame reads
//! lower the tick rate instead of queueing ticks.

use std::time::{Duration, Instant};

use super::Clock;
use crate::card::TickTimer;

/// Tracks when the next tick is due.
#[derive(Debug)]
pub struct Scheduler<C> {
    clock: C,
    next_due: Option<Instant>,
}

impl<C: Clock> Scheduler<C> {
    /// Creates an idle scheduler reading time from `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_due: None,
        }
    }

    /// Aligns the deadline with the timer's running state.
    pub fn sync(&mut self, timer: &TickTimer) {
        if timer.is_running() {
            if self.next_due.is_none() {
                self.next_due = Some(self.clock.now() + timer.period());
            }
        } else {
            self.next_due = None;
        }
    }

    /// How long until the next tick, or `None` when idle.
    pub fn wait_time(&self) -> Option<Duration> {
        self.next_due
            .map(|due| due.saturating_duration_since(self.clock.now()))
    }

    /// Returns true when a tick is due, and schedules the one after it.
    pub fn poll(&mut self, timer: &TickTimer) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        let now = self.clock.now();
        if now < due {
            return false;
        }
        self.next_due = if timer.is_running() {
            Some(now + timer.period())
        } else {
            None
        };
        true
    }

    /// Returns true while a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ManualClock;

    const PERIOD: Duration = Duration::from_millis(20);

    fn running_timer() -> TickTimer {
        let mut timer = TickTimer::new(PERIOD);
        timer.start();
        timer
    }

    #[test]
    fn test_idle_without_running_timer() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new(&clock);
        let timer = TickTimer::new(PERIOD);

        scheduler.sync(&timer);
        assert!(!scheduler.is_armed());
        assert_eq!(scheduler.wait_time(), None);
        assert!(!scheduler.poll(&timer));
    }

    #[test]
    fn test_fires_once_per_period() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new(&clock);
        let timer = running_timer();

        scheduler.sync(&timer);
        assert_eq!(scheduler.wait_time(), Some(PERIOD));
        assert!(!scheduler.poll(&timer));

        clock.advance(PERIOD);
        assert!(scheduler.poll(&timer));
        assert!(!scheduler.poll(&timer));

        clock.advance(Duration::from_millis(10));
        assert_eq!(scheduler.wait_time(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_late_tick_not_caught_up() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new(&clock);
        let timer = running_timer();
        scheduler.sync(&timer);

        // Five periods pass during a slow read
        clock.advance(PERIOD * 5);
        assert!(scheduler.poll(&timer));
        assert!(!scheduler.poll(&timer));
        assert_eq!(scheduler.wait_time(), Some(PERIOD));
    }

    #[test]
    fn test_stopping_timer_disarms() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new(&clock);
        let mut timer = running_timer();
        scheduler.sync(&timer);
        assert!(scheduler.is_armed());

        timer.stop();
        scheduler.sync(&timer);
        assert!(!scheduler.is_armed());
    }
}
