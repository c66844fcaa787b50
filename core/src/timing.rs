//! Elapsed-time counters consulted synchronously by the frame loop.

use std::{cell::Cell, fmt, time::Duration, time::Instant};

/// Source of monotonically increasing time readings.
pub trait Clock: fmt::Debug {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall clock measuring from its construction.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Starts a clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced explicitly by the caller.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Stopwatch over clock readings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timing {
    started_at: Option<Duration>,
}

impl Timing {
    /// Creates a stopped timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { started_at: None }
    }

    /// Starts the timer if it is stopped.
    pub fn start(&mut self, now: Duration) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Starts the timer again from `now`.
    pub fn restart(&mut self, now: Duration) {
        self.started_at = Some(now);
    }

    /// Stops the timer.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Reports whether the timer runs.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time since the last start, zero when stopped.
    #[must_use]
    pub fn elapsed(&self, now: Duration) -> Duration {
        self.started_at
            .map_or(Duration::ZERO, |started| now.saturating_sub(started))
    }

    /// Reports whether at least `period` elapsed since the last start.
    #[must_use]
    pub fn elapsed_at_least(&self, now: Duration, period: Duration) -> bool {
        self.is_started() && self.elapsed(now) >= period
    }
}
