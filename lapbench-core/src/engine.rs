//! Suite execution: the two-phase state machine that turns a declared
//! suite into a [`RunnerResult`].
//!
//! Phase one hands a [`SuiteContext`] to the suite's definition callback
//! and collects test definitions and hooks. Phase two drives every test
//! through a wall-clock-bounded sampling loop. Only the method invocation
//! sits inside the timed window; fixture cost (hooks, prepare resolution,
//! reporting) lands in `overhead` instead of `duration`.
//!
//! Fixed iteration counts are unreliable across machines; bounding each
//! test by elapsed wall clock normalizes cost across heterogeneous
//! hardware while still producing a meaningful sample count.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use lapbench_stats::OnlineStats;
use thiserror::Error;

use crate::context::{Hooks, SuiteContext, TestDefinition, TestFilter};
use crate::reporter::Reporter;
use crate::result::{RunnerResult, TestFailure, TestResult};
use crate::suite::Suite;
use crate::timing::{SampleGate, DEFAULT_SAMPLE_PERIOD};

/// Default cadence of progress callbacks during a test's loop.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Errors that abort an entire suite run.
///
/// Per-test failures are recovered locally into [`TestResult::error`];
/// these two are the only conditions with no partial result to return.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The definition callback panicked during the declaration phase.
    #[error("suite '{suite}' failed during declaration: {failure}")]
    Declaration {
        /// Suite that failed.
        suite: String,
        /// Normalized panic payload.
        failure: TestFailure,
    },

    /// A `before_all` hook failed; the run was abandoned before any test.
    #[error("suite '{suite}' failed in before_all: {failure}")]
    Setup {
        /// Suite that failed.
        suite: String,
        /// Normalized hook failure.
        failure: TestFailure,
    },
}

/// Options for a single engine run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Case-insensitive substring filters; a test is registered only if
    /// its name contains one of them. Empty means no filtering.
    pub tests: Vec<String>,
    /// Cadence of progress callbacks during a test's loop.
    pub progress_every: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            tests: Vec::new(),
            progress_every: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Declare and execute one suite.
///
/// The definition callback runs exactly once per call; registered tests
/// execute in declaration order, each under its own time budget. A
/// failing test never stops its siblings. A failing `after_all` hook is
/// recorded on the result rather than discarding what was collected.
pub fn run_tests(
    suite: &Suite,
    options: &RunOptions,
    reporter: &mut dyn Reporter,
) -> Result<RunnerResult, EngineError> {
    // Declaration phase.
    let mut ctx = SuiteContext::new(suite, TestFilter::new(&options.tests));
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| suite.declare(&mut ctx))) {
        return Err(EngineError::Declaration {
            suite: suite.name().to_string(),
            failure: TestFailure::from_panic(payload),
        });
    }
    let (tests, mut hooks) = ctx.into_parts();

    // Execution phase.
    for hook in &mut hooks.before_all {
        if let Err(failure) = run_hook(hook) {
            return Err(EngineError::Setup {
                suite: suite.name().to_string(),
                failure,
            });
        }
    }

    let mut results = Vec::with_capacity(tests.len());
    for test in tests {
        reporter.test_start(&test.name);
        let result = run_single_test(test, suite.timeout(), options, &mut hooks, reporter);
        reporter.test_end(&result);
        results.push(result);
    }

    let mut teardown_error = None;
    for hook in &mut hooks.after_all {
        if let Err(failure) = run_hook(hook) {
            teardown_error = Some(failure);
            break;
        }
    }

    Ok(RunnerResult {
        name: suite.name().to_string(),
        description: suite.description().map(String::from),
        results,
        teardown_error,
    })
}

/// Drive one test's sampling loop to completion.
fn run_single_test(
    test: TestDefinition,
    default_timeout: Duration,
    options: &RunOptions,
    hooks: &mut Hooks,
    reporter: &mut dyn Reporter,
) -> TestResult {
    let timeout = test.timeout.unwrap_or(default_timeout);
    let test_start = Instant::now();

    let mut duration = Duration::ZERO;
    let mut iterations = 0u64;
    let mut iteration_callbacks = 0u64;
    let mut stats = OnlineStats::new();
    let mut error = None;

    // Resolve the prepare thunk outside the timed window. A failure here
    // skips the loop entirely: zero iterations, error recorded.
    let method = match catch_unwind(AssertUnwindSafe(|| (test.prepare)())) {
        Ok(Ok(method)) => Some(method),
        Ok(Err(failure)) => {
            error = Some(failure);
            None
        }
        Err(payload) => {
            error = Some(TestFailure::from_panic(payload));
            None
        }
    };

    if let Some(mut method) = method {
        let mut gate = SampleGate::new(DEFAULT_SAMPLE_PERIOD);
        let loop_start = Instant::now();
        let mut next_progress = options.progress_every;

        'sampling: while loop_start.elapsed() < timeout {
            for hook in &mut hooks.before_each {
                if let Err(failure) = run_hook(hook) {
                    error = Some(failure);
                    break 'sampling;
                }
            }

            let iteration_start = Instant::now();
            let outcome = match catch_unwind(AssertUnwindSafe(|| method())) {
                Ok(outcome) => outcome,
                Err(payload) => Err(TestFailure::from_panic(payload)),
            };
            let delta = iteration_start.elapsed();

            // A failed pass stops the loop at once: no after_each, and the
            // attempt is not counted.
            if let Err(failure) = outcome {
                error = Some(failure);
                break;
            }

            for hook in &mut hooks.after_each {
                if let Err(failure) = run_hook(hook) {
                    error = Some(failure);
                    break 'sampling;
                }
            }

            duration += delta;
            iterations += 1;
            if gate.admit(Instant::now()) {
                stats.push(delta.as_secs_f64() * 1_000.0);
            }

            if loop_start.elapsed() >= next_progress {
                iteration_callbacks += 1;
                if let Err(failure) = reporter.test_iteration(&test.name, iterations, duration) {
                    error = Some(failure);
                    break;
                }
                next_progress += options.progress_every;
            }
        }
    }

    TestResult {
        name: test.name,
        duration,
        iterations,
        error,
        timeout,
        overhead: test_start.elapsed().saturating_sub(duration),
        iteration_callbacks,
        stats,
    }
}

/// Invoke one hook, normalizing panics.
fn run_hook(hook: &mut crate::context::HookFn) -> Result<(), TestFailure> {
    match catch_unwind(AssertUnwindSafe(|| hook())) {
        Ok(outcome) => outcome,
        Err(payload) => Err(TestFailure::from_panic(payload)),
    }
}
