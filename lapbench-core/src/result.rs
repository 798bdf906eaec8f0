//! Result types produced by a suite run.

use std::any::Any;
use std::time::Duration;

use lapbench_stats::OnlineStats;
use serde::{Deserialize, Serialize};

/// Normalized failure captured from a test method, hook, prepare step, or
/// progress reporter.
///
/// Every failure source (a panic payload, an `Err` returned by user code,
/// a reporter refusing an update) is flattened to a message string so
/// [`TestResult::error`] always carries one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct TestFailure {
    message: String,
}

impl TestFailure {
    /// Failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extract a message from a `catch_unwind` payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self { message }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of driving one test to completion (budget exhausted or error).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Test name as registered.
    pub name: String,
    /// Total time spent inside the timed method across all passes. Hook
    /// and reporting time is never included.
    pub duration: Duration,
    /// Completed passes. A pass that failed is not counted.
    pub iterations: u64,
    /// Failure that ended the loop early, if any.
    pub error: Option<TestFailure>,
    /// Effective time budget the loop ran under.
    pub timeout: Duration,
    /// Wall clock of the whole test minus `duration`: hooks, reporting,
    /// prepare resolution and loop bookkeeping.
    pub overhead: Duration,
    /// Number of progress callbacks fired during the loop.
    pub iteration_callbacks: u64,
    /// Per-iteration duration statistics in milliseconds, sampled at most
    /// once per elapsed millisecond.
    pub stats: OnlineStats,
}

impl TestResult {
    /// Completed iterations per second of measured time.
    pub fn throughput(&self) -> Option<f64> {
        let secs = self.duration.as_secs_f64();
        (secs > 0.0).then(|| self.iterations as f64 / secs)
    }

    /// Whether the loop ended by exhausting its budget rather than by a
    /// failure.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of running an entire suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerResult {
    /// Suite name.
    pub name: String,
    /// Suite description, if declared.
    pub description: Option<String>,
    /// One result per executed test, in declaration order.
    pub results: Vec<TestResult>,
    /// Failure raised by an `after_all` hook. Collected results are kept
    /// alongside it rather than discarded.
    pub teardown_error: Option<TestFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_extraction() {
        let from_str = std::panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(TestFailure::from_panic(from_str).message(), "static message");

        let from_string =
            std::panic::catch_unwind(|| panic!("value was {}", 42)).unwrap_err();
        assert_eq!(TestFailure::from_panic(from_string).message(), "value was 42");

        let opaque = std::panic::catch_unwind(|| std::panic::panic_any(7u32)).unwrap_err();
        assert_eq!(TestFailure::from_panic(opaque).message(), "unknown panic");
    }

    #[test]
    fn test_throughput() {
        let result = TestResult {
            name: "t".to_string(),
            duration: Duration::from_millis(500),
            iterations: 1000,
            error: None,
            timeout: Duration::from_millis(500),
            overhead: Duration::ZERO,
            iteration_callbacks: 0,
            stats: OnlineStats::new(),
        };
        assert!((result.throughput().unwrap() - 2000.0).abs() < 1e-9);

        let empty = TestResult {
            duration: Duration::ZERO,
            iterations: 0,
            ..result
        };
        assert_eq!(empty.throughput(), None);
    }
}
