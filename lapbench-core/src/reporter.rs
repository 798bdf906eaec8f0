//! Reporting collaborator interface.
//!
//! The engine and orchestrator talk to a [`Reporter`]; concrete console
//! rendering lives outside the core. Every method defaults to a no-op so
//! correctness never depends on a reporter being present.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::result::{RunnerResult, TestFailure, TestResult};
use crate::suite::Suite;

/// Name/description pair listed when a selection matched nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteInfo {
    /// Suite name.
    pub name: String,
    /// Suite description, if declared.
    pub description: Option<String>,
}

/// Progress and outcome sink consumed by the engine and orchestrator.
///
/// Only [`test_iteration`](Reporter::test_iteration) may fail; its error
/// terminates the reporting test's loop so a misbehaving reporter cannot
/// leave the loop in an inconsistent state.
pub trait Reporter {
    /// A suite is about to run.
    fn suite_start(&mut self, _suite: &Suite) {}

    /// A suite finished.
    fn suite_end(&mut self, _result: &RunnerResult) {}

    /// A test's sampling loop is about to start.
    fn test_start(&mut self, _name: &str) {}

    /// A test produced its result.
    fn test_end(&mut self, _result: &TestResult) {}

    /// Periodic progress from inside a sampling loop.
    fn test_iteration(
        &mut self,
        _name: &str,
        _iterations: u64,
        _duration: Duration,
    ) -> Result<(), TestFailure> {
        Ok(())
    }

    /// A whole orchestration cycle matched nothing; `available` lists
    /// every registered suite as a discovery aid.
    fn no_suites_matched(&mut self, _available: &[SuiteInfo]) {}
}

/// Reporter that swallows everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {}
