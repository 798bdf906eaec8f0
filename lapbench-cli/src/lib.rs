#![warn(missing_docs)]
//! Lapbench CLI Library
//!
//! CLI infrastructure for benchmark binaries. Call [`run`] from your
//! binary's `main()` to get the full lapbench experience with every suite
//! registered through `inventory`:
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = lapbench_cli::run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod config;
mod console;
mod json;

pub use config::{LapConfig, OutputSection, RunnerSection};
pub use console::{format_duration, format_human_output, render_no_match, SpinnerReporter};
pub use json::{build_report, generate_json_report, ReportMeta, RunReport, SCHEMA_VERSION};

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use lapbench_core::{run_suites, RunnerOptions, SuiteRegistry, SuiteSelector};

/// Lapbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "lapbench")]
#[command(author, version, about = "Lapbench - suite-based micro-benchmark harness")]
pub struct Cli {
    /// Optional subcommand (List, Run); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suite selectors: names (prefix-matched) or the literal "all"
    #[arg(default_value = "all")]
    pub selectors: Vec<String>,

    /// Repeat the whole selection+execution cycle N times
    #[arg(long)]
    pub repeat: Option<u32>,

    /// Override every suite's default test budget (e.g. "250ms", "2s")
    #[arg(long)]
    pub timeout: Option<String>,

    /// Only run suites whose name contains one of these substrings
    #[arg(long = "suite")]
    pub suites: Vec<String>,

    /// Only run tests whose name contains one of these substrings
    #[arg(long = "test")]
    pub tests: Vec<String>,

    /// Output format: human or json
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all registered suites
    List,
    /// Run suites (default)
    Run,
}

/// Run the lapbench CLI against every suite registered via `inventory`.
///
/// This is the main entry point for benchmark binaries.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let registry = SuiteRegistry::from_inventory();
    run_with_cli(cli, &registry)
}

/// Run the lapbench CLI with pre-parsed arguments and an explicit
/// registry.
pub fn run_with_cli(cli: Cli, registry: &SuiteRegistry) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("lapbench=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("lapbench=info")
            .init();
    }

    // Discover lapbench.toml configuration (CLI flags override)
    let config = LapConfig::discover().unwrap_or_default();

    match cli.command {
        Some(Commands::List) => list_suites(registry),
        Some(Commands::Run) | None => run_benchmark_suites(&cli, &config, registry),
    }
}

fn list_suites(registry: &SuiteRegistry) -> anyhow::Result<()> {
    let suites = registry.active_suites();
    println!("Lapbench suites:");
    for suite in &suites {
        match suite.description() {
            Some(description) => println!("  {}  {}", suite.name(), description),
            None => println!("  {}", suite.name()),
        }
    }
    println!("{} suites found.", suites.len());
    Ok(())
}

/// Layer config-file defaults under CLI overrides.
fn build_runner_options(cli: &Cli, config: &LapConfig) -> anyhow::Result<RunnerOptions> {
    let timeout = match cli.timeout.as_deref().or(config.runner.timeout.as_deref()) {
        Some(spec) => Some(Duration::from_millis(LapConfig::parse_duration(spec)?)),
        None => None,
    };

    Ok(RunnerOptions {
        repeat: cli.repeat.or(config.runner.repeat).unwrap_or(1),
        timeout,
        suites: cli.suites.clone(),
        tests: cli.tests.clone(),
    })
}

fn run_benchmark_suites(
    cli: &Cli,
    config: &LapConfig,
    registry: &SuiteRegistry,
) -> anyhow::Result<()> {
    let options = build_runner_options(cli, config)?;
    let selectors: Vec<SuiteSelector> = cli
        .selectors
        .iter()
        .map(|arg| SuiteSelector::parse(arg))
        .collect();

    tracing::debug!(
        registered = registry.len(),
        repeat = options.repeat,
        "starting benchmark run"
    );

    let results = {
        let mut reporter = SpinnerReporter::new();
        run_suites(registry, &selectors, &options, &mut reporter)?
    };

    let format = cli.format.as_deref().unwrap_or(&config.output.format);
    let rendered = match format {
        "json" => {
            let report = build_report(results.clone());
            generate_json_report(&report)?
        }
        _ => format_human_output(&results),
    };

    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)?;
        file.write_all(rendered.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", rendered);
    }

    // Exit non-zero when anything failed, so CI catches it.
    let failures = results
        .iter()
        .flat_map(|suite| suite.results.iter())
        .filter(|test| !test.is_ok())
        .count()
        + results
            .iter()
            .filter(|suite| suite.teardown_error.is_some())
            .count();

    if failures > 0 {
        eprintln!("\n{} failure(s) during benchmark run", failures);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_runner_options_layers_cli_over_config() {
        let cli = Cli::parse_from(["lapbench", "--timeout", "250ms", "--repeat", "2"]);
        let mut config = LapConfig::default();
        config.runner.timeout = Some("5s".to_string());
        config.runner.repeat = Some(7);

        let options = build_runner_options(&cli, &config).unwrap();
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));
        assert_eq!(options.repeat, 2);
    }

    #[test]
    fn test_build_runner_options_falls_back_to_config() {
        let cli = Cli::parse_from(["lapbench"]);
        let mut config = LapConfig::default();
        config.runner.timeout = Some("1s".to_string());

        let options = build_runner_options(&cli, &config).unwrap();
        assert_eq!(options.timeout, Some(Duration::from_millis(1_000)));
        assert_eq!(options.repeat, 1);
    }

    #[test]
    fn test_cli_collects_filters_and_selectors() {
        let cli = Cli::parse_from([
            "lapbench", "alpha", "beta", "--suite", "al", "--test", "encode", "--test", "decode",
        ]);
        assert_eq!(cli.selectors, ["alpha", "beta"]);
        assert_eq!(cli.suites, ["al"]);
        assert_eq!(cli.tests, ["encode", "decode"]);
    }

    #[test]
    fn test_cli_default_selector_is_all() {
        let cli = Cli::parse_from(["lapbench"]);
        assert_eq!(cli.selectors, ["all"]);
    }
}
