//! Configuration loading from lapbench.toml.
//!
//! Defaults can be specified in a `lapbench.toml` file in the project
//! root; the file is discovered by walking up from the current directory
//! and CLI flags override anything it sets.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lapbench configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LapConfig {
    /// Runner defaults.
    #[serde(default)]
    pub runner: RunnerSection,
    /// Output defaults.
    #[serde(default)]
    pub output: OutputSection,
}

/// `[runner]` section: loop defaults applied when the CLI does not
/// override them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunnerSection {
    /// Global test-budget override (e.g. "250ms", "2s"). Unset means each
    /// suite keeps its own default.
    #[serde(default)]
    pub timeout: Option<String>,
    /// How many times to repeat the whole selection+execution cycle.
    #[serde(default)]
    pub repeat: Option<u32>,
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Default output format: "human" or "json".
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl LapConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("lapbench.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Parse a duration string (e.g. "500ms", "3s", "2m") to
    /// milliseconds.
    pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and the unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ms" => 1,
            "s" | "" => 1_000,
            "m" | "min" => 60_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok((value * multiplier as f64) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LapConfig::default();
        assert_eq!(config.runner.timeout, None);
        assert_eq!(config.runner.repeat, None);
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(LapConfig::parse_duration("500ms").unwrap(), 500);
        assert_eq!(LapConfig::parse_duration("3s").unwrap(), 3_000);
        assert_eq!(LapConfig::parse_duration("2m").unwrap(), 120_000);
        assert_eq!(LapConfig::parse_duration("1.5s").unwrap(), 1_500);
        assert_eq!(LapConfig::parse_duration("45").unwrap(), 45_000);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(LapConfig::parse_duration("").is_err());
        assert!(LapConfig::parse_duration("fast").is_err());
        assert!(LapConfig::parse_duration("10lightyears").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            timeout = "250ms"
            repeat = 3

            [output]
            format = "json"
        "#;

        let config: LapConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.timeout.as_deref(), Some("250ms"));
        assert_eq!(config.runner.repeat, Some(3));
        assert_eq!(config.output.format, "json");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LapConfig = toml::from_str("[runner]\nrepeat = 2\n").unwrap();
        assert_eq!(config.runner.repeat, Some(2));
        assert_eq!(config.runner.timeout, None);
        assert_eq!(config.output.format, "human");
    }
}
