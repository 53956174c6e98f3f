use std::time::{Duration, Instant};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Ticking,
    Stopped,
}

/// Fixed-interval refresh timer driven by the caller's clock. Ticks never
/// overlap: a tick that runs past one or more boundaries pushes the next
/// tick to the first boundary after it finished. Once stopped it never
/// fires again.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    interval: Duration,
    next_due: Instant,
    phase: Phase,
}

impl RefreshScheduler {
    pub fn new(interval: Duration, first_due: Instant) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: first_due,
            phase: Phase::Idle,
        }
    }

    pub fn next_due(&self) -> Option<Instant> {
        match self.phase {
            Phase::Stopped => None,
            Phase::Idle | Phase::Ticking => Some(self.next_due),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == Phase::Stopped
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.phase == Phase::Idle && now >= self.next_due
    }

    /// Starts a tick if one is due and none is running.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.phase = Phase::Ticking;
        true
    }

    /// Ends the running tick and schedules the next boundary after `now`.
    pub fn finish(&mut self, now: Instant) {
        if self.phase != Phase::Ticking {
            return;
        }
        self.phase = Phase::Idle;
        while self.next_due <= now {
            self.next_due += self.interval;
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due()
            .map(|due| due.saturating_duration_since(now))
    }

    pub fn shutdown(&mut self) {
        self.phase = Phase::Stopped;
    }
}
