//! The registration context handed to a suite's definition callback.
//!
//! Everything a suite declares — tests, prepared data, lifecycle hooks,
//! the default timeout — goes through [`SuiteContext`]. The context lives
//! for the declaration phase of a single run; nothing registered through
//! it survives into the next run.

use std::cell::RefCell;
use std::fmt::Display;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use crate::result::TestFailure;
use crate::suite::Suite;

/// Conversion of a user closure's return value into the engine's
/// pass/fail shape.
///
/// Implemented for `()` (infallible benchmark bodies) and for any
/// `Result` whose error displays. Panics are caught separately by the
/// engine, so both spellings of failure normalize to [`TestFailure`].
pub trait IntoOutcome {
    /// Convert into the normalized outcome.
    fn into_outcome(self) -> Result<(), TestFailure>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<(), TestFailure> {
        Ok(())
    }
}

impl<T, E: Display> IntoOutcome for Result<T, E> {
    fn into_outcome(self) -> Result<(), TestFailure> {
        match self {
            Ok(_) => Ok(()),
            Err(e) => Err(TestFailure::new(e.to_string())),
        }
    }
}

pub(crate) type HookFn = Box<dyn FnMut() -> Result<(), TestFailure>>;
pub(crate) type TimedFn = Box<dyn FnMut() -> Result<(), TestFailure>>;
pub(crate) type PrepareThunk = Box<dyn FnOnce() -> Result<TimedFn, TestFailure>>;

/// One registered test awaiting execution.
pub(crate) struct TestDefinition {
    pub(crate) name: String,
    pub(crate) timeout: Option<Duration>,
    pub(crate) prepare: PrepareThunk,
}

/// Lifecycle hooks in registration order, per kind.
#[derive(Default)]
pub(crate) struct Hooks {
    pub(crate) before_all: Vec<HookFn>,
    pub(crate) after_all: Vec<HookFn>,
    pub(crate) before_each: Vec<HookFn>,
    pub(crate) after_each: Vec<HookFn>,
}

/// Case-insensitive OR-of-substrings name filter, applied at registration
/// time so filtered-out tests never prepare or consume hook time.
pub(crate) struct TestFilter {
    needles: Vec<String>,
}

impl TestFilter {
    pub(crate) fn new(needles: &[String]) -> Self {
        Self {
            needles: needles.iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    pub(crate) fn admits(&self, name: &str) -> bool {
        if self.needles.is_empty() {
            return true;
        }
        let name = name.to_lowercase();
        self.needles.iter().any(|needle| name.contains(needle))
    }
}

/// Lazily-built current-thread runtime shared by a suite's async tests.
///
/// Construction is deferred until the first async test actually runs, and
/// the runtime is reused across iterations to keep its cost out of the
/// timed window.
pub(crate) struct AsyncRuntime {
    cell: RefCell<Option<tokio::runtime::Runtime>>,
}

impl AsyncRuntime {
    fn new() -> Self {
        Self {
            cell: RefCell::new(None),
        }
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> Result<F::Output, TestFailure> {
        let mut slot = self.cell.borrow_mut();
        if slot.is_none() {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| TestFailure::new(format!("failed to build async runtime: {}", e)))?;
            *slot = Some(runtime);
        }
        let runtime = slot
            .as_ref()
            .ok_or_else(|| TestFailure::new("async runtime unavailable"))?;
        Ok(runtime.block_on(future))
    }
}

/// Memoized cell behind a [`PrepareHandle`]: the factory runs at most
/// once, its product is shared by every test on the handle.
struct PrepareCell<T> {
    factory: RefCell<Option<Box<dyn FnOnce() -> T>>>,
    value: RefCell<Option<Rc<T>>>,
}

impl<T> PrepareCell<T> {
    fn resolve(&self) -> Result<Rc<T>, TestFailure> {
        if let Some(value) = self.value.borrow().as_ref() {
            return Ok(Rc::clone(value));
        }
        // A consumed factory with no cached value means an earlier resolve
        // panicked part-way; surface that instead of re-running setup.
        let factory = self
            .factory
            .borrow_mut()
            .take()
            .ok_or_else(|| TestFailure::new("prepare callback failed in an earlier test"))?;
        let value = Rc::new(factory());
        *self.value.borrow_mut() = Some(Rc::clone(&value));
        Ok(value)
    }
}

/// Registration handle bound to a memoized prepared value.
///
/// Obtained from [`SuiteContext::prepare`]. Tests registered through the
/// same handle share one lazily-computed value; the factory runs at most
/// once per suite run no matter how many tests (or timed iterations)
/// consume its product.
pub struct PrepareHandle<T> {
    cell: Rc<PrepareCell<T>>,
    tests: Rc<RefCell<Vec<TestDefinition>>>,
    filter: Rc<TestFilter>,
}

impl<T: 'static> PrepareHandle<T> {
    /// Register a test over the prepared value.
    pub fn test<O, F>(&self, name: impl Into<String>, method: F)
    where
        F: FnMut(&T) -> O + 'static,
        O: IntoOutcome,
    {
        self.register(name.into(), None, method);
    }

    /// Register a test with its own time budget.
    pub fn test_with_timeout<O, F>(&self, name: impl Into<String>, timeout: Duration, method: F)
    where
        F: FnMut(&T) -> O + 'static,
        O: IntoOutcome,
    {
        self.register(name.into(), Some(timeout), method);
    }

    fn register<O, F>(&self, name: String, timeout: Option<Duration>, mut method: F)
    where
        F: FnMut(&T) -> O + 'static,
        O: IntoOutcome,
    {
        if !self.filter.admits(&name) {
            return;
        }
        let cell = Rc::clone(&self.cell);
        let prepare: PrepareThunk = Box::new(move || {
            let data = cell.resolve()?;
            let timed: TimedFn =
                Box::new(move || std::hint::black_box(method(&data)).into_outcome());
            Ok(timed)
        });
        self.tests
            .borrow_mut()
            .push(TestDefinition { name, timeout, prepare });
    }
}

/// Registration API exposed to a suite's definition callback.
pub struct SuiteContext<'a> {
    suite: &'a Suite,
    filter: Rc<TestFilter>,
    tests: Rc<RefCell<Vec<TestDefinition>>>,
    hooks: Hooks,
    runtime: Rc<AsyncRuntime>,
}

impl<'a> SuiteContext<'a> {
    pub(crate) fn new(suite: &'a Suite, filter: TestFilter) -> Self {
        Self {
            suite,
            filter: Rc::new(filter),
            tests: Rc::new(RefCell::new(Vec::new())),
            hooks: Hooks::default(),
            runtime: Rc::new(AsyncRuntime::new()),
        }
    }

    /// Register an immediately-runnable test.
    pub fn test<O, F>(&mut self, name: impl Into<String>, method: F)
    where
        F: FnMut() -> O + 'static,
        O: IntoOutcome,
    {
        self.register_test(name.into(), None, method);
    }

    /// Register a test with its own time budget overriding the suite
    /// default.
    pub fn test_with_timeout<O, F>(&mut self, name: impl Into<String>, timeout: Duration, method: F)
    where
        F: FnMut() -> O + 'static,
        O: IntoOutcome,
    {
        self.register_test(name.into(), Some(timeout), method);
    }

    /// Register a test whose body is asynchronous.
    ///
    /// The future is driven to completion on a cached current-thread
    /// runtime shared across the suite's async tests, so execution stays
    /// strictly sequential and the runtime build cost is paid once.
    pub fn test_async<O, F, Fut>(&mut self, name: impl Into<String>, mut future_fn: F)
    where
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = O>,
        O: IntoOutcome,
    {
        let runtime = Rc::clone(&self.runtime);
        self.register_test(name.into(), None, move || {
            runtime
                .block_on(future_fn())
                .and_then(IntoOutcome::into_outcome)
        });
    }

    /// Defer expensive setup and share its product across tests.
    ///
    /// The factory does not run here; the first test registered through
    /// the returned handle resolves it during execution, and every later
    /// test reuses the memoized value. Memoization is scoped to this run.
    pub fn prepare<T: 'static>(&mut self, factory: impl FnOnce() -> T + 'static) -> PrepareHandle<T> {
        PrepareHandle {
            cell: Rc::new(PrepareCell {
                factory: RefCell::new(Some(Box::new(factory))),
                value: RefCell::new(None),
            }),
            tests: Rc::clone(&self.tests),
            filter: Rc::clone(&self.filter),
        }
    }

    /// Run once before any test in the suite.
    pub fn before_all<O: IntoOutcome>(&mut self, hook: impl FnMut() -> O + 'static) {
        self.hooks.before_all.push(wrap_hook(hook));
    }

    /// Run once after every test in the suite.
    pub fn after_all<O: IntoOutcome>(&mut self, hook: impl FnMut() -> O + 'static) {
        self.hooks.after_all.push(wrap_hook(hook));
    }

    /// Run before every timed iteration, outside the timed window.
    pub fn before_each<O: IntoOutcome>(&mut self, hook: impl FnMut() -> O + 'static) {
        self.hooks.before_each.push(wrap_hook(hook));
    }

    /// Run after every successful timed iteration, outside the timed
    /// window.
    pub fn after_each<O: IntoOutcome>(&mut self, hook: impl FnMut() -> O + 'static) {
        self.hooks.after_each.push(wrap_hook(hook));
    }

    /// Current default timeout for tests without their own.
    pub fn timeout(&self) -> Duration {
        self.suite.timeout()
    }

    /// Replace the default timeout; writes through to the suite.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.suite.set_timeout(timeout);
    }

    pub(crate) fn into_parts(self) -> (Vec<TestDefinition>, Hooks) {
        (self.tests.take(), self.hooks)
    }

    fn register_test<O, F>(&mut self, name: String, timeout: Option<Duration>, mut method: F)
    where
        F: FnMut() -> O + 'static,
        O: IntoOutcome,
    {
        if !self.filter.admits(&name) {
            return;
        }
        let prepare: PrepareThunk = Box::new(move || {
            let timed: TimedFn = Box::new(move || std::hint::black_box(method()).into_outcome());
            Ok(timed)
        });
        self.tests
            .borrow_mut()
            .push(TestDefinition { name, timeout, prepare });
    }
}

fn wrap_hook<O: IntoOutcome>(mut hook: impl FnMut() -> O + 'static) -> HookFn {
    Box::new(move || hook().into_outcome())
}
