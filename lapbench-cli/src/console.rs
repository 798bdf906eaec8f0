//! Console rendering: live spinner during runs and the human summary.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use lapbench_core::{Reporter, RunnerResult, Suite, SuiteInfo, TestFailure, TestResult};

/// Spinner-style live reporter for interactive runs.
///
/// Progress updates drive the spinner message; completed tests and suite
/// banners are printed above it so they survive the spinner's redraws.
pub struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    /// Reporter with a steadily ticking spinner.
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl Default for SpinnerReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SpinnerReporter {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl Reporter for SpinnerReporter {
    fn suite_start(&mut self, suite: &Suite) {
        match suite.description() {
            Some(description) => self
                .bar
                .println(format!("Suite {} ({})", suite.name(), description)),
            None => self.bar.println(format!("Suite {}", suite.name())),
        }
    }

    fn suite_end(&mut self, _result: &RunnerResult) {
        self.bar.set_message(String::new());
    }

    fn test_start(&mut self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn test_end(&mut self, result: &TestResult) {
        let mark = if result.is_ok() { "✓" } else { "✗" };
        self.bar.println(format!("  {} {}", mark, summarize(result)));
    }

    fn test_iteration(
        &mut self,
        name: &str,
        iterations: u64,
        duration: Duration,
    ) -> Result<(), TestFailure> {
        self.bar.set_message(format!(
            "{}: {} iterations in {}",
            name,
            iterations,
            format_duration(duration)
        ));
        Ok(())
    }

    fn no_suites_matched(&mut self, available: &[SuiteInfo]) {
        self.bar.println(render_no_match(available));
    }
}

/// Format a duration as a compact human string.
pub fn format_duration(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1_000.0;
    format_ms(ms)
}

/// Format a millisecond value as a compact human string.
fn format_ms(ms: f64) -> String {
    if ms < 1.0 {
        format!("{:.1}µs", ms * 1_000.0)
    } else if ms < 1_000.0 {
        format!("{:.2}ms", ms)
    } else {
        format!("{:.2}s", ms / 1_000.0)
    }
}

/// One line per test: iterations plus the summary statistics, or the
/// failure that stopped the loop.
fn summarize(result: &TestResult) -> String {
    if let Some(error) = &result.error {
        return format!(
            "{}: failed after {} iterations: {}",
            result.name, result.iterations, error
        );
    }

    let ops = match result.throughput() {
        Some(t) => format!("{:.0} ops/s", t),
        None => "no throughput".to_string(),
    };

    match (
        result.stats.mean(),
        result.stats.p95(),
        result.stats.min(),
        result.stats.max(),
    ) {
        (Ok(mean), Ok(p95), Some(min), Some(max)) => format!(
            "{}: {} iterations, mean {} p95 {} min {} max {} ({})",
            result.name,
            result.iterations,
            format_ms(mean),
            format_ms(p95),
            format_ms(min),
            format_ms(max),
            ops
        ),
        _ => format!(
            "{}: {} iterations in {} ({})",
            result.name,
            result.iterations,
            format_duration(result.duration),
            ops
        ),
    }
}

/// Human-readable report of a full run.
pub fn format_human_output(results: &[RunnerResult]) -> String {
    let mut output = String::new();

    for suite in results {
        output.push('\n');
        match &suite.description {
            Some(description) => {
                output.push_str(&format!("{} ({})\n", suite.name, description))
            }
            None => output.push_str(&format!("{}\n", suite.name)),
        }
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for test in &suite.results {
            let mark = if test.is_ok() { "✓" } else { "✗" };
            output.push_str(&format!("  {} {}\n", mark, summarize(test)));
        }

        if let Some(error) = &suite.teardown_error {
            output.push_str(&format!("  ! teardown failed: {}\n", error));
        }
    }

    let total: usize = results.iter().map(|r| r.results.len()).sum();
    let failed: usize = results
        .iter()
        .flat_map(|r| r.results.iter())
        .filter(|t| !t.is_ok())
        .count();
    output.push_str(&format!(
        "\n{} suites, {} tests, {} failed\n",
        results.len(),
        total,
        failed
    ));

    output
}

/// Discovery listing printed when a selection matched nothing.
pub fn render_no_match(available: &[SuiteInfo]) -> String {
    let mut output = String::from("No suites matched the selection. Registered suites:\n");
    if available.is_empty() {
        output.push_str("  (none)\n");
        return output;
    }
    for info in available {
        match &info.description {
            Some(description) => {
                output.push_str(&format!("  {}  {}\n", info.name, description))
            }
            None => output.push_str(&format!("  {}\n", info.name)),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapbench_core::OnlineStats;

    fn passing_result() -> TestResult {
        let mut stats = OnlineStats::new();
        stats.push(0.9);
        stats.push(1.1);
        TestResult {
            name: "encode".to_string(),
            duration: Duration::from_millis(100),
            iterations: 100,
            error: None,
            timeout: Duration::from_millis(500),
            overhead: Duration::from_millis(2),
            iteration_callbacks: 1,
            stats,
        }
    }

    #[test]
    fn test_format_ms_ranges() {
        assert_eq!(format_ms(0.5), "500.0µs");
        assert_eq!(format_ms(1.5), "1.50ms");
        assert_eq!(format_ms(2_500.0), "2.50s");
    }

    #[test]
    fn test_summarize_passing_test() {
        let line = summarize(&passing_result());
        assert!(line.contains("encode"));
        assert!(line.contains("100 iterations"));
        assert!(line.contains("ops/s"));
        assert!(line.contains("mean"));
    }

    #[test]
    fn test_summarize_failed_test() {
        let mut result = passing_result();
        result.error = Some(TestFailure::new("ran aground"));
        let line = summarize(&result);
        assert!(line.contains("failed after"));
        assert!(line.contains("ran aground"));
    }

    #[test]
    fn test_human_output_marks_failures() {
        let mut failing = passing_result();
        failing.error = Some(TestFailure::new("nope"));
        let suite = RunnerResult {
            name: "demo".to_string(),
            description: None,
            results: vec![passing_result(), failing],
            teardown_error: None,
        };

        let output = format_human_output(&[suite]);
        assert!(output.contains("✓"));
        assert!(output.contains("✗"));
        assert!(output.contains("1 suites, 2 tests, 1 failed"));
    }

    #[test]
    fn test_no_match_listing_includes_descriptions() {
        let listing = render_no_match(&[
            SuiteInfo {
                name: "alpha".to_string(),
                description: Some("first".to_string()),
            },
            SuiteInfo {
                name: "beta".to_string(),
                description: None,
            },
        ]);
        assert!(listing.contains("alpha"));
        assert!(listing.contains("first"));
        assert!(listing.contains("beta"));
    }
}
