//! Multi-suite orchestration: selector resolution, de-duplication,
//! repetition, and no-match discovery.
//!
//! Name selectors use case-insensitive **prefix** matching against
//! registered suite names; the `suites` option is a separate
//! case-insensitive **substring** containment filter. Suites run strictly
//! in sequence, never interleaved.

use std::rc::Rc;
use std::time::Duration;

use crate::engine::{run_tests, EngineError, RunOptions};
use crate::registry::SuiteRegistry;
use crate::reporter::{Reporter, SuiteInfo};
use crate::result::RunnerResult;
use crate::suite::Suite;

/// One entry in the ordered selection handed to [`run_suites`].
#[derive(Clone)]
pub enum SuiteSelector {
    /// Every registered suite.
    All,
    /// Suites whose name starts with this string, case-insensitively.
    Name(String),
    /// A specific suite instance, registered or not.
    Suite(Rc<Suite>),
}

impl SuiteSelector {
    /// Map a CLI argument to a selector; the literal `"all"` is the
    /// wildcard.
    pub fn parse(arg: &str) -> Self {
        if arg.eq_ignore_ascii_case("all") {
            SuiteSelector::All
        } else {
            SuiteSelector::Name(arg.to_string())
        }
    }
}

/// Options applied across one orchestration call.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// How many times to repeat the whole selection+execution cycle.
    pub repeat: u32,
    /// Overrides every selected suite's default timeout before it runs.
    pub timeout: Option<Duration>,
    /// Case-insensitive substrings a suite's name must contain (empty
    /// means no filtering).
    pub suites: Vec<String>,
    /// Test-name filters forwarded into each suite's run.
    pub tests: Vec<String>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            repeat: 1,
            timeout: None,
            suites: Vec::new(),
            tests: Vec::new(),
        }
    }
}

/// Resolve `selectors` against the registry and run each matched suite in
/// order, repeating the whole cycle `options.repeat` times.
///
/// Within one cycle a suite runs at most once no matter how many
/// selectors match it. Repetition stops early when a cycle runs nothing;
/// if the final cycle ran nothing, the reporter receives the full
/// registry listing once as a discovery aid.
pub fn run_suites(
    registry: &SuiteRegistry,
    selectors: &[SuiteSelector],
    options: &RunnerOptions,
    reporter: &mut dyn Reporter,
) -> Result<Vec<RunnerResult>, EngineError> {
    let run_options = RunOptions {
        tests: options.tests.clone(),
        ..RunOptions::default()
    };

    let mut all_results = Vec::new();
    let mut ran_in_final_cycle = 0usize;

    for _ in 0..options.repeat.max(1) {
        let mut ran: Vec<Rc<Suite>> = Vec::new();
        for selector in selectors {
            for suite in resolve(registry, selector) {
                if ran.iter().any(|s| Rc::ptr_eq(s, &suite)) {
                    continue;
                }
                if !name_contains_any(suite.name(), &options.suites) {
                    continue;
                }
                if let Some(timeout) = options.timeout {
                    suite.set_timeout(timeout);
                }
                reporter.suite_start(&suite);
                let result = run_tests(&suite, &run_options, reporter)?;
                reporter.suite_end(&result);
                all_results.push(result);
                ran.push(Rc::clone(&suite));
            }
        }
        ran_in_final_cycle = ran.len();
        if ran.is_empty() {
            break;
        }
    }

    if ran_in_final_cycle == 0 {
        let available: Vec<SuiteInfo> = registry
            .active_suites()
            .iter()
            .map(|suite| SuiteInfo {
                name: suite.name().to_string(),
                description: suite.description().map(String::from),
            })
            .collect();
        reporter.no_suites_matched(&available);
    }

    Ok(all_results)
}

/// Suites matched by one selector, in registration order.
fn resolve(registry: &SuiteRegistry, selector: &SuiteSelector) -> Vec<Rc<Suite>> {
    match selector {
        SuiteSelector::All => registry.active_suites(),
        SuiteSelector::Suite(suite) => vec![Rc::clone(suite)],
        SuiteSelector::Name(prefix) => {
            let prefix = prefix.to_lowercase();
            registry
                .active_suites()
                .into_iter()
                .filter(|suite| suite.name().to_lowercase().starts_with(&prefix))
                .collect()
        }
    }
}

fn name_contains_any(name: &str, filters: &[String]) -> bool {
    if filters.is_empty() {
        return true;
    }
    let name = name.to_lowercase();
    filters
        .iter()
        .any(|filter| name.contains(&filter.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::SuiteConfig;

    /// Reporter that records orchestration events for assertions.
    #[derive(Default)]
    struct RecordingReporter {
        started: Vec<String>,
        listings: Vec<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn suite_start(&mut self, suite: &Suite) {
            self.started.push(suite.name().to_string());
        }

        fn no_suites_matched(&mut self, available: &[SuiteInfo]) {
            self.listings
                .push(available.iter().map(|info| info.name.clone()).collect());
        }
    }

    fn seeded_registry() -> SuiteRegistry {
        let mut registry = SuiteRegistry::new();
        for name in ["alpha-1", "alpha-2", "beta"] {
            registry.register(Suite::new(
                SuiteConfig::named(name).with_timeout(Duration::from_millis(5)),
                |ctx| {
                    ctx.test("noop", || {});
                },
            ));
        }
        registry
    }

    #[test]
    fn test_prefix_matching_selects_family() {
        let registry = seeded_registry();
        let mut reporter = RecordingReporter::default();

        run_suites(
            &registry,
            &[SuiteSelector::Name("alpha".to_string())],
            &RunnerOptions::default(),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(reporter.started, ["alpha-1", "alpha-2"]);
    }

    #[test]
    fn test_prefix_matching_is_case_insensitive() {
        let registry = seeded_registry();
        let mut reporter = RecordingReporter::default();

        run_suites(
            &registry,
            &[SuiteSelector::Name("ALPHA-1".to_string())],
            &RunnerOptions::default(),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(reporter.started, ["alpha-1"]);
    }

    #[test]
    fn test_all_plus_explicit_runs_each_once() {
        let registry = seeded_registry();
        let mut reporter = RecordingReporter::default();

        let results = run_suites(
            &registry,
            &[
                SuiteSelector::All,
                SuiteSelector::Name("beta".to_string()),
            ],
            &RunnerOptions::default(),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(reporter.started, ["alpha-1", "alpha-2", "beta"]);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_suites_filter_excludes_by_substring() {
        let registry = seeded_registry();
        let mut reporter = RecordingReporter::default();

        let options = RunnerOptions {
            suites: vec!["ALPHA".to_string()],
            ..RunnerOptions::default()
        };
        run_suites(&registry, &[SuiteSelector::All], &options, &mut reporter).unwrap();

        assert_eq!(reporter.started, ["alpha-1", "alpha-2"]);
    }

    #[test]
    fn test_repeat_runs_cycles_in_order() {
        let registry = seeded_registry();
        let mut reporter = RecordingReporter::default();

        let options = RunnerOptions {
            repeat: 2,
            ..RunnerOptions::default()
        };
        run_suites(
            &registry,
            &[SuiteSelector::Name("beta".to_string())],
            &options,
            &mut reporter,
        )
        .unwrap();

        assert_eq!(reporter.started, ["beta", "beta"]);
        assert!(reporter.listings.is_empty());
    }

    #[test]
    fn test_empty_match_stops_repeats_and_lists_once() {
        let registry = seeded_registry();
        let mut reporter = RecordingReporter::default();

        let options = RunnerOptions {
            repeat: 3,
            ..RunnerOptions::default()
        };
        let results = run_suites(
            &registry,
            &[SuiteSelector::Name("gamma".to_string())],
            &options,
            &mut reporter,
        )
        .unwrap();

        assert!(results.is_empty());
        assert!(reporter.started.is_empty());
        assert_eq!(reporter.listings.len(), 1);
        assert_eq!(reporter.listings[0], ["alpha-1", "alpha-2", "beta"]);
    }

    #[test]
    fn test_timeout_override_applies_before_run() {
        let registry = seeded_registry();
        let mut reporter = RecordingReporter::default();

        let options = RunnerOptions {
            timeout: Some(Duration::from_millis(20)),
            ..RunnerOptions::default()
        };
        let results = run_suites(
            &registry,
            &[SuiteSelector::Name("beta".to_string())],
            &options,
            &mut reporter,
        )
        .unwrap();

        assert_eq!(results[0].results[0].timeout, Duration::from_millis(20));
    }

    #[test]
    fn test_literal_suite_selector_runs_unregistered_suite() {
        let registry = seeded_registry();
        let loose = Suite::new(
            SuiteConfig::named("loose").with_timeout(Duration::from_millis(5)),
            |ctx| {
                ctx.test("noop", || {});
            },
        );
        let mut reporter = RecordingReporter::default();

        let results = run_suites(
            &registry,
            &[SuiteSelector::Suite(loose)],
            &RunnerOptions::default(),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "loose");
    }

    #[test]
    fn test_tests_filter_forwarded_into_suites() {
        let mut registry = SuiteRegistry::new();
        registry.register(Suite::new(
            SuiteConfig::named("mixed").with_timeout(Duration::from_millis(5)),
            |ctx| {
                ctx.test("encode_small", || {});
                ctx.test("decode_small", || {});
            },
        ));

        let options = RunnerOptions {
            tests: vec!["encode".to_string()],
            ..RunnerOptions::default()
        };
        let results = run_suites(
            &registry,
            &[SuiteSelector::All],
            &options,
            &mut crate::reporter::NullReporter,
        )
        .unwrap();

        assert_eq!(results[0].results.len(), 1);
        assert_eq!(results[0].results[0].name, "encode_small");
    }

    #[test]
    fn test_selector_parse() {
        assert!(matches!(SuiteSelector::parse("all"), SuiteSelector::All));
        assert!(matches!(SuiteSelector::parse("All"), SuiteSelector::All));
        assert!(matches!(
            SuiteSelector::parse("alpha"),
            SuiteSelector::Name(name) if name == "alpha"
        ));
    }
}
