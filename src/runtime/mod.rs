//! Event loop and time handling.

mod clock;
mod event_loop;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use event_loop::EventLoop;
pub use scheduler::Scheduler;
