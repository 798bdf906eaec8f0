//! Suite declaration model.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::context::SuiteContext;

/// Default time budget for tests that do not declare their own.
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_millis(500);

/// Configuration for constructing a [`Suite`].
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Suite name; selectors and filters match against it.
    pub name: String,
    /// Optional human-readable description, shown in discovery listings.
    pub description: Option<String>,
    /// Default time budget for the suite's tests.
    pub timeout: Duration,
}

impl SuiteConfig {
    /// Config with the given name and defaults for everything else.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            timeout: DEFAULT_TEST_TIMEOUT,
        }
    }

    /// Set the description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the default test timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A named, lazily-executed group of benchmark tests sharing lifecycle
/// hooks and a timeout default.
///
/// The definition callback runs exactly once per engine run; the tests it
/// declares live only for that run. Execution is single-threaded by
/// design (interleaving would corrupt wall-clock measurements), so suites
/// are reference-counted with `Rc` rather than shared across threads.
pub struct Suite {
    name: String,
    description: Option<String>,
    timeout: Cell<Duration>,
    define: Box<dyn Fn(&mut SuiteContext)>,
}

impl Suite {
    /// Build a suite from explicit configuration and a definition
    /// callback.
    pub fn new(config: SuiteConfig, define: impl Fn(&mut SuiteContext) + 'static) -> Rc<Self> {
        Rc::new(Self {
            name: config.name,
            description: config.description,
            timeout: Cell::new(config.timeout),
            define: Box::new(define),
        })
    }

    /// Suite name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Suite description, if declared.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Current default budget for tests without their own timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout.get()
    }

    /// Replace the default budget; the next run picks it up.
    pub fn set_timeout(&self, timeout: Duration) {
        self.timeout.set(timeout);
    }

    /// Run the definition callback against a fresh registration context.
    pub(crate) fn declare(&self, ctx: &mut SuiteContext) {
        (self.define)(ctx);
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("timeout", &self.timeout.get())
            .finish_non_exhaustive()
    }
}

/// Static suite declaration collected through `inventory`.
///
/// Lets a benchmark binary declare suites at module scope and have
/// [`crate::SuiteRegistry::from_inventory`] pick them up at startup:
///
/// ```ignore
/// fn define_hashing(ctx: &mut SuiteContext) {
///     ctx.test("fnv", || { /* ... */ });
/// }
///
/// inventory::submit! {
///     SuiteDef {
///         name: "hashing",
///         description: Some("hash function costs"),
///         timeout_ms: None,
///         define: define_hashing,
///     }
/// }
/// ```
pub struct SuiteDef {
    /// Suite name.
    pub name: &'static str,
    /// Optional description.
    pub description: Option<&'static str>,
    /// Optional default-timeout override in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Definition callback invoked once per run.
    pub define: fn(&mut SuiteContext),
}

inventory::collect!(SuiteDef);

/// Anchor to prevent LTO from stripping inventory entries
#[used]
#[doc(hidden)]
pub static REGISTRY_ANCHOR: fn() = || {
    for _ in inventory::iter::<SuiteDef> {}
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SuiteConfig::named("demo");
        assert_eq!(config.name, "demo");
        assert_eq!(config.description, None);
        assert_eq!(config.timeout, DEFAULT_TEST_TIMEOUT);
    }

    #[test]
    fn test_timeout_setter_writes_through() {
        let suite = Suite::new(SuiteConfig::named("demo"), |_| {});
        assert_eq!(suite.timeout(), DEFAULT_TEST_TIMEOUT);

        suite.set_timeout(Duration::from_millis(50));
        assert_eq!(suite.timeout(), Duration::from_millis(50));
    }
}
