//! Process-wide suite collection.

use std::rc::Rc;
use std::time::Duration;

use crate::suite::{Suite, SuiteConfig, SuiteDef};

/// Ordered, additive collection of declared suites.
///
/// Benchmarks are declared once at startup and run later by the
/// orchestrator, so a shared discovery point is needed without threading
/// suite references through every layer. The registry is that point,
/// owned explicitly rather than hidden in a global: identity (not name)
/// keys the set, registration order is preserved, and there is no
/// removal.
#[derive(Debug, Default)]
pub struct SuiteRegistry {
    suites: Vec<Rc<Suite>>,
}

impl SuiteRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with every static [`SuiteDef`] submitted through
    /// `inventory`, in link order.
    pub fn from_inventory() -> Self {
        let mut registry = Self::new();
        for def in inventory::iter::<SuiteDef> {
            let mut config = SuiteConfig::named(def.name);
            if let Some(description) = def.description {
                config = config.describe(description);
            }
            if let Some(ms) = def.timeout_ms {
                config = config.with_timeout(Duration::from_millis(ms));
            }
            let define = def.define;
            registry.register(Suite::new(config, move |ctx| define(ctx)));
        }
        registry
    }

    /// Add a suite unless this exact instance is already present.
    pub fn register(&mut self, suite: Rc<Suite>) {
        if self.suites.iter().any(|s| Rc::ptr_eq(s, &suite)) {
            return;
        }
        self.suites.push(suite);
    }

    /// Snapshot of the registered suites in registration order.
    pub fn active_suites(&self) -> Vec<Rc<Suite>> {
        self.suites.clone()
    }

    /// Number of registered suites.
    pub fn len(&self) -> usize {
        self.suites.len()
    }

    /// Whether the registry holds no suites.
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}
