//! Configuration loading from benchtest.toml
//!
//! benchtest configuration can be specified in a `benchtest.toml` file in the
//! project root. The file is discovered by walking up from the current
//! directory; every field has a default.

use benchtest_core::{
    ConfigError, DEFAULT_MARKER, DEFAULT_MAX_CYCLES, DEFAULT_MIN_CYCLES, DEFAULT_SENSITIVITY,
    Eligibility, SamplerConfig,
};
use benchtest_report::{OutputFormat, Sink};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name searched for by [`BenchtestConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "benchtest.toml";

/// benchtest configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchtestConfig {
    /// Sampler thresholds
    #[serde(default)]
    pub sampler: SamplerSection,
    /// Report output
    #[serde(default)]
    pub output: OutputSection,
    /// Which units are sampled
    #[serde(default)]
    pub eligibility: EligibilitySection,
}

/// Sampler thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerSection {
    /// Minimum cycle number before convergence may be declared
    #[serde(default = "default_min_cycles")]
    pub min_cycles: u64,
    /// Exclusive cycle ceiling
    #[serde(default = "default_max_cycles")]
    pub max_cycles: u64,
    /// Maximum variance/mean ratio for convergence
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
}

impl Default for SamplerSection {
    fn default() -> Self {
        Self {
            min_cycles: default_min_cycles(),
            max_cycles: default_max_cycles(),
            sensitivity: default_sensitivity(),
        }
    }
}

fn default_min_cycles() -> u64 {
    DEFAULT_MIN_CYCLES
}
fn default_max_cycles() -> u64 {
    DEFAULT_MAX_CYCLES
}
fn default_sensitivity() -> f64 {
    DEFAULT_SENSITIVITY
}

/// Report output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    /// "table" or "structured"
    #[serde(default)]
    pub format: OutputFormat,
    /// "stdout" or "stderr"
    #[serde(default)]
    pub sink: Sink,
}

/// How eligibility is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EligibilityMode {
    /// Units whose name ends with the marker
    #[default]
    Marker,
    /// Every unit
    All,
    /// No unit
    Off,
}

/// Eligibility configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilitySection {
    /// "marker", "all" or "off"
    #[serde(default)]
    pub mode: EligibilityMode,
    /// Trailing marker used in "marker" mode
    #[serde(default = "default_marker")]
    pub marker: char,
}

impl Default for EligibilitySection {
    fn default() -> Self {
        Self {
            mode: EligibilityMode::default(),
            marker: default_marker(),
        }
    }
}

fn default_marker() -> char {
    DEFAULT_MARKER
}

impl BenchtestConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Validated sampler configuration
    pub fn sampler(&self) -> Result<SamplerConfig, ConfigError> {
        SamplerConfig::new(
            self.sampler.min_cycles,
            self.sampler.max_cycles,
            self.sampler.sensitivity,
        )
    }

    /// Eligibility policy
    pub fn eligibility(&self) -> Eligibility {
        match self.eligibility.mode {
            EligibilityMode::Marker => Eligibility::Marker(self.eligibility.marker),
            EligibilityMode::All => Eligibility::All,
            EligibilityMode::Off => Eligibility::Off,
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r##"# benchtest Configuration

[sampler]
# Minimum cycle number before convergence may be declared
min_cycles = 10
# Exclusive cycle ceiling: at most max_cycles - 1 cycles run
max_cycles = 100
# Maximum variance/mean ratio for convergence
sensitivity = 0.01

[output]
# Report format: table or structured
format = "table"
# Report destination: stdout or stderr
sink = "stdout"

[eligibility]
# Which units are sampled: marker, all or off
mode = "marker"
# Trailing character that marks a unit in marker mode
marker = "#"
"##
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BenchtestConfig::default();
        let sampler = config.sampler().unwrap();
        assert_eq!(sampler.min_cycles(), 10);
        assert_eq!(sampler.max_cycles(), 100);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert_eq!(config.eligibility(), Eligibility::Marker('#'));
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [sampler]
            max_cycles = 40

            [output]
            format = "json"

            [eligibility]
            mode = "all"
        "#;

        let config: BenchtestConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sampler.max_cycles, 40);
        // Defaults should still apply
        assert_eq!(config.sampler.min_cycles, 10);
        assert_eq!(config.output.format, OutputFormat::Structured);
        assert_eq!(config.output.sink, Sink::Stdout);
        assert_eq!(config.eligibility(), Eligibility::All);
    }

    #[test]
    fn test_invalid_sampler_section() {
        let config: BenchtestConfig = toml::from_str("[sampler]\nsensitivity = -1.0\n").unwrap();
        assert!(matches!(
            config.sampler(),
            Err(ConfigError::InvalidSensitivity(_))
        ));
    }

    #[test]
    fn test_custom_marker() {
        let config: BenchtestConfig =
            toml::from_str("[eligibility]\nmarker = \"!\"\n").unwrap();
        assert_eq!(config.eligibility(), Eligibility::Marker('!'));
    }

    #[test]
    fn test_default_toml_parses() {
        let default_toml = BenchtestConfig::default_toml();
        let config: BenchtestConfig = toml::from_str(&default_toml).unwrap();
        assert_eq!(config.sampler.max_cycles, 100);
        assert_eq!(config.eligibility(), Eligibility::Marker('#'));
    }
}
