use std::time::{Duration, Instant};

/// Self-rescheduling position poll.
///
/// Runs on the owner's loop: the owner asks `fire_if_due` on every turn and
/// uses `time_until_due` to bound how long it may block.
#[derive(Debug, Clone)]
pub struct PositionPoll {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PositionPoll {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// (Re)start the schedule; the first tick is due immediately.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    /// Drop every pending tick.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns true when a tick is due at `now` and schedules the next one.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
