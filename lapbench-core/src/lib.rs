#![warn(missing_docs)]
//! Lapbench Core - Suite Model and Execution Engine
//!
//! This crate provides the heart of the lapbench harness:
//! - [`Suite`] / [`SuiteConfig`] / [`SuiteDef`] for declaring benchmark
//!   suites, either at runtime or statically via `inventory`
//! - [`SuiteContext`] — the registration API handed to a suite's
//!   definition callback (tests, prepared data, lifecycle hooks)
//! - [`run_tests`] — the two-phase engine driving each test through a
//!   wall-clock-bounded sampling loop with online statistics
//! - [`run_suites`] — the orchestrator resolving name selectors against a
//!   [`SuiteRegistry`], with de-duplication, repetition and no-match
//!   discovery
//! - [`Reporter`] — the progress/outcome collaborator interface; concrete
//!   rendering lives outside this crate
//!
//! # Quick Start
//!
//! ```ignore
//! use lapbench_core::{run_tests, NullReporter, RunOptions, Suite, SuiteConfig};
//!
//! let suite = Suite::new(SuiteConfig::named("strings"), |ctx| {
//!     let corpus = ctx.prepare(|| vec!["lorem"; 1024].join(" "));
//!     corpus.test("split_words", |text| {
//!         std::hint::black_box(text.split(' ').count());
//!     });
//! });
//!
//! let result = run_tests(&suite, &RunOptions::default(), &mut NullReporter)?;
//! # Ok::<(), lapbench_core::EngineError>(())
//! ```

mod context;
mod engine;
mod registry;
mod reporter;
mod result;
mod runner;
mod suite;
mod timing;

pub use lapbench_stats::{OnlineStats, StatsError};

pub use context::{IntoOutcome, PrepareHandle, SuiteContext};
pub use engine::{run_tests, EngineError, RunOptions, DEFAULT_PROGRESS_INTERVAL};
pub use registry::SuiteRegistry;
pub use reporter::{NullReporter, Reporter, SuiteInfo};
pub use result::{RunnerResult, TestFailure, TestResult};
pub use runner::{run_suites, RunnerOptions, SuiteSelector};
pub use suite::{Suite, SuiteConfig, SuiteDef, DEFAULT_TEST_TIMEOUT, REGISTRY_ANCHOR};
pub use timing::{SampleGate, DEFAULT_SAMPLE_PERIOD};
