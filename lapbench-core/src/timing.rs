//! Sampling-rate control for the timed loop.

use std::time::{Duration, Instant};

/// Default cap on how often an iteration duration is admitted into the
/// statistics accumulator.
pub const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_millis(1);

/// Admits at most one event per period against a monotonic clock.
///
/// The engine offers every iteration's duration to the accumulator through
/// one of these. In a sub-microsecond loop that caps accumulator traffic
/// at roughly one sample per elapsed millisecond instead of one per pass,
/// bounding the accumulator's own overhead.
#[derive(Debug)]
pub struct SampleGate {
    period: Duration,
    next: Option<Instant>,
}

impl SampleGate {
    /// Gate admitting one event per `period`.
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Whether an event at `now` passes the gate. Admission advances the
    /// next-allowed timestamp to `now + period`; the first offer always
    /// passes.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now < next => false,
            _ => {
                self.next = Some(now + self.period);
                true
            }
        }
    }
}
