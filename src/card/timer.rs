//! Lifecycle state of the periodic frame tick.
//!
//! This only records whether ticks are wanted and at what period.
//! Turning that into wall-clock deadlines is the job of
//! [`Scheduler`](crate::runtime::Scheduler), which keeps the controller
//! free of real time.

use std::time::Duration;

/// Start/stop state of the frame tick.
#[derive(Debug, Clone)]
pub struct TickTimer {
    period: Duration,
    running: bool,
    starts: u64,
}

impl TickTimer {
    /// Creates a stopped timer.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: false,
            starts: 0,
        }
    }

    /// Starts the timer. Has no effect while already running.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.starts += 1;
            tracing::debug!(period_ms = self.period.as_millis() as u64, "Tick timer started");
        }
    }

    /// Stops the timer. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            tracing::debug!("Tick timer stopped");
        }
    }

    /// Returns true while ticks should fire.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time between ticks.
    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of stopped-to-running transitions so far.
    #[inline]
    pub fn starts(&self) -> u64 {
        self.starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_not_restarted() {
        let mut timer = TickTimer::new(Duration::from_millis(20));
        assert!(!timer.is_running());

        timer.start();
        timer.start();
        assert!(timer.is_running());
        assert_eq!(timer.starts(), 1);

        timer.stop();
        timer.stop();
        assert!(!timer.is_running());

        timer.start();
        assert_eq!(timer.starts(), 2);
    }
}
