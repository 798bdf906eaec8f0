#![warn(missing_docs)]
//! # Lapbench
//!
//! Suite-based micro-benchmark harness for Rust.
//!
//! Lapbench lets you declare named suites of timed tests, run each test
//! under a shared wall-clock budget, and report throughput/latency
//! statistics (mean, p95, min/max, ops/sec) per test:
//!
//! - **Time-bounded loops**: tests run until their budget expires instead
//!   of for a fixed iteration count, normalizing cost across machines
//! - **Prepare once, test many**: expensive setup is memoized and shared
//!   across the tests that declared it, outside the timed window
//! - **Per-test failure isolation**: a panicking or erroring test records
//!   its failure and lets its siblings keep running
//! - **Online statistics**: constant-memory mean/variance/min/max with an
//!   approximate p95, sampled at most once per elapsed millisecond
//! - **Selector-based orchestration**: run `"all"` suites or match them
//!   by name prefix, with repeat cycles and substring filters
//!
//! ## Quick Start
//!
//! ```ignore
//! use lapbench::prelude::*;
//!
//! fn define_strings(ctx: &mut SuiteContext) {
//!     let corpus = ctx.prepare(|| vec!["lorem"; 4096].join(" "));
//!     corpus.test("split_words", |text| {
//!         black_box(text.split(' ').count());
//!     });
//!     ctx.test("format_int", || {
//!         black_box(86_400u64.to_string());
//!     });
//! }
//!
//! inventory::submit! {
//!     SuiteDef { name: "strings", description: None, timeout_ms: None, define: define_strings }
//! }
//!
//! fn main() {
//!     if let Err(e) = lapbench::run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

// Re-export core types
pub use lapbench_core::{
    run_suites, run_tests, EngineError, IntoOutcome, NullReporter, PrepareHandle, Reporter,
    RunOptions, RunnerOptions, RunnerResult, Suite, SuiteConfig, SuiteContext, SuiteDef,
    SuiteInfo, SuiteRegistry, SuiteSelector, TestFailure, TestResult, DEFAULT_PROGRESS_INTERVAL,
    DEFAULT_SAMPLE_PERIOD, DEFAULT_TEST_TIMEOUT, REGISTRY_ANCHOR,
};

// Re-export statistics
pub use lapbench_stats::{OnlineStats, StatsError};

// Re-export the CLI entry point and rendering helpers
pub use lapbench_cli::{run, run_with_cli, Cli, SpinnerReporter};

pub use std::hint::black_box;

/// Prelude for convenient imports in benchmark binaries.
pub mod prelude {
    pub use crate::{
        black_box, NullReporter, Reporter, Suite, SuiteConfig, SuiteContext, SuiteDef,
        SuiteRegistry, SuiteSelector,
    };
}
