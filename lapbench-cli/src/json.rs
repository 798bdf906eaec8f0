//! JSON report generation.

use chrono::{DateTime, Utc};
use lapbench_core::RunnerResult;
use serde::{Deserialize, Serialize};

/// Schema version for the JSON report.
pub const SCHEMA_VERSION: u32 = 1;

/// Top-level JSON report for one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Report metadata.
    pub meta: ReportMeta,
    /// One entry per executed suite, in execution order.
    pub suites: Vec<RunnerResult>,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Schema version of this report layout.
    pub schema_version: u32,
    /// Harness version that produced the report.
    pub version: String,
    /// When the report was generated.
    pub timestamp: DateTime<Utc>,
}

/// Wrap a run's results with metadata.
pub fn build_report(suites: Vec<RunnerResult>) -> RunReport {
    RunReport {
        meta: ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        },
        suites,
    }
}

/// Serialize a report as pretty-printed JSON.
pub fn generate_json_report(report: &RunReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapbench_core::{OnlineStats, TestResult};
    use std::time::Duration;

    #[test]
    fn test_report_round_trips() {
        let mut stats = OnlineStats::new();
        stats.push(1.0);
        stats.push(2.0);

        let report = build_report(vec![RunnerResult {
            name: "demo".to_string(),
            description: Some("round trip".to_string()),
            results: vec![TestResult {
                name: "t".to_string(),
                duration: Duration::from_millis(42),
                iterations: 10,
                error: None,
                timeout: Duration::from_millis(500),
                overhead: Duration::from_millis(1),
                iteration_callbacks: 0,
                stats,
            }],
            teardown_error: None,
        }]);

        let json = generate_json_report(&report).unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.meta.schema_version, SCHEMA_VERSION);
        assert_eq!(parsed.suites.len(), 1);
        assert_eq!(parsed.suites[0].results[0].iterations, 10);
        assert_eq!(parsed.suites[0].results[0].stats.count(), 2);
    }
}
