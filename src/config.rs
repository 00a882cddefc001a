//! Analysis configuration via TOML files.
//!
//! Every section and key is optional; missing values fall back to defaults.
//!
//! ```toml
//! [analysis]
//! noise_levels = [0.1, 0.2, 0.3, 0.4]
//! max_variables = 20
//!
//! [linearity]
//! samples = 10
//! seed = 42
//!
//! [logging]
//! path = "logs/analysis.jsonl"
//! ```

use std::fs;
use std::path::Path;

use serde::Serialize;
use toml::Value;

use crate::error::{AnalysisError, AnalysisResult};
use crate::features::{features_of, FeatureVector, DEFAULT_NOISE_LEVELS};
use crate::linearity::{LinearityTester, DEFAULT_SAMPLES, DEFAULT_SEED};
use crate::truth_table::{infer_num_variables, BooleanFunction, MAX_VARIABLES};

const DEFAULT_MAX_VARIABLES: usize = 20;

/// Settings shared by the feature pipeline and the linearity tester.
///
/// # Examples
///
/// ```
/// use boolean_spectral_core::AnalysisConfig;
///
/// let config = AnalysisConfig::load_from_file("config/analysis.toml")
///     .unwrap_or_else(|_| AnalysisConfig::default());
///
/// println!("noise levels: {:?}", config.noise_levels);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    /// Noise levels reported in feature vectors, each in `[0, 1]`
    pub noise_levels: Vec<f64>,
    /// Largest arity accepted by [`AnalysisConfig::features`]
    pub max_variables: usize,
    /// Trials per linearity test
    pub linearity_samples: usize,
    /// Seed for the linearity tester's generator
    pub linearity_seed: u64,
    /// JSON-lines log target; logging stays off when unset
    pub log_path: Option<String>,
}

impl AnalysisConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let value: Value =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let analysis = section(&value, "analysis");
        let linearity = section(&value, "linearity");
        let logging = section(&value, "logging");

        let noise_levels = match analysis.get("noise_levels") {
            None => Self::default_noise_levels(),
            Some(raw) => {
                let items = raw.as_array().ok_or_else(|| {
                    ConfigError::Parse("analysis.noise_levels must be an array".into())
                })?;
                let levels = items
                    .iter()
                    .map(|item| {
                        as_number(item)
                            .map(|level| level.clamp(0.0, 1.0))
                            .ok_or_else(|| {
                                ConfigError::Parse(format!(
                                    "noise level {item} must be a number"
                                ))
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if levels.is_empty() {
                    Self::default_noise_levels()
                } else {
                    levels
                }
            }
        };

        let max_variables = analysis
            .get("max_variables")
            .and_then(|v| v.as_integer())
            .map(|v| v.clamp(1, MAX_VARIABLES as i64) as usize)
            .unwrap_or(DEFAULT_MAX_VARIABLES);

        let linearity_samples = linearity
            .get("samples")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(1) as usize)
            .unwrap_or(DEFAULT_SAMPLES);

        let linearity_seed = match linearity.get("seed") {
            None => DEFAULT_SEED,
            Some(raw) => raw
                .as_integer()
                .filter(|seed| *seed >= 0)
                .map(|seed| seed as u64)
                .ok_or_else(|| {
                    ConfigError::Parse("linearity.seed must be a non-negative integer".into())
                })?,
        };

        let log_path = logging
            .get("path")
            .and_then(|v| v.as_str())
            .filter(|path| !path.trim().is_empty())
            .map(str::to_string);

        Ok(Self {
            noise_levels,
            max_variables,
            linearity_samples,
            linearity_seed,
            log_path,
        })
    }

    fn default_noise_levels() -> Vec<f64> {
        DEFAULT_NOISE_LEVELS.to_vec()
    }

    pub fn linearity_tester(&self) -> LinearityTester {
        LinearityTester::new(self.linearity_samples, self.linearity_seed)
    }

    /// Reject arities above [`AnalysisConfig::max_variables`].
    pub fn check_arity(&self, num_variables: usize) -> AnalysisResult<()> {
        if num_variables > self.max_variables {
            return Err(AnalysisError::too_many_variables(
                num_variables,
                self.max_variables,
            ));
        }
        Ok(())
    }

    /// Feature vector for `bits` at the configured noise levels.
    pub fn features(&self, bits: &[u8]) -> AnalysisResult<FeatureVector> {
        let num_variables = infer_num_variables(bits.len())?;
        self.check_arity(num_variables)?;
        let function = BooleanFunction::from_bits(bits, num_variables)?;
        Ok(features_of(&function, &self.noise_levels))
    }

    /// Point the JSON-lines log at [`AnalysisConfig::log_path`], if set.
    pub fn init_logging(&self) -> std::io::Result<bool> {
        match &self.log_path {
            Some(path) => crate::logging::init(path).map(|_| true),
            None => Ok(false),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            noise_levels: Self::default_noise_levels(),
            max_variables: DEFAULT_MAX_VARIABLES,
            linearity_samples: DEFAULT_SAMPLES,
            linearity_seed: DEFAULT_SEED,
            log_path: None,
        }
    }
}

fn section(value: &Value, name: &str) -> toml::value::Table {
    value
        .get(name)
        .and_then(|v| v.as_table())
        .cloned()
        .unwrap_or_default()
}

fn as_number(value: &Value) -> Option<f64> {
    if let Some(float) = value.as_float() {
        Some(float)
    } else {
        value.as_integer().map(|int| int as f64)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_sections_missing() {
        let config = AnalysisConfig::from_str("[other]\nkey = 1").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.noise_levels, vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(config.linearity_samples, 10);
        assert!(config.log_path.is_none());
    }

    #[test]
    fn parses_custom_values() {
        let toml = "[analysis]\nnoise_levels = [0.05, 1, 0.5]\nmax_variables = 12\n\n[linearity]\nsamples = 200\nseed = 7\n\n[logging]\npath = \"logs/run.jsonl\"";
        let config = AnalysisConfig::from_str(toml).unwrap();
        assert_eq!(config.noise_levels, vec![0.05, 1.0, 0.5]);
        assert_eq!(config.max_variables, 12);
        assert_eq!(config.linearity_tester(), LinearityTester::new(200, 7));
        assert_eq!(config.log_path.as_deref(), Some("logs/run.jsonl"));
    }

    #[test]
    fn clamps_out_of_range_values() {
        let toml = "[analysis]\nnoise_levels = [-0.5, 2.0]\nmax_variables = 400\n\n[linearity]\nsamples = 0";
        let config = AnalysisConfig::from_str(toml).unwrap();
        assert_eq!(config.noise_levels, vec![0.0, 1.0]);
        assert_eq!(config.max_variables, MAX_VARIABLES);
        assert_eq!(config.linearity_samples, 1);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(AnalysisConfig::from_str("[analysis]\nnoise_levels = \"high\"").is_err());
        assert!(AnalysisConfig::from_str("[analysis]\nnoise_levels = [\"a\"]").is_err());
        assert!(AnalysisConfig::from_str("[linearity]\nseed = -3").is_err());
        assert!(AnalysisConfig::from_str("not toml = = =").is_err());
    }

    #[test]
    fn features_respect_arity_limit_and_levels() {
        let config =
            AnalysisConfig::from_str("[analysis]\nmax_variables = 2\nnoise_levels = [0.5]")
                .unwrap();
        let features = config.features(&[0, 1, 1, 0]).unwrap();
        assert_eq!(features.noise_levels(), &[0.5]);
        assert_eq!(features.len(), 2 + 3 + 1);

        let err = config.features(&[0; 8]).unwrap_err();
        assert_eq!(err, AnalysisError::too_many_variables(3, 2));
    }

    #[test]
    fn load_from_file_reports_io_errors() {
        let err = AnalysisConfig::load_from_file("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
