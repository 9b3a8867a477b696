//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Tolerance for the weight sum check.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Blend of performance and popularity in a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default = "default_performance_weight")]
    pub performance: f64,

    #[serde(default = "default_usage_weight")]
    pub usage: f64,
}

fn default_performance_weight() -> f64 {
    0.7
}

fn default_usage_weight() -> f64 {
    0.3
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            performance: default_performance_weight(),
            usage: default_usage_weight(),
        }
    }
}

/// Usage percentage bounds.
///
/// `min` is both the clamp floor for the usage component and the viability
/// threshold used by tiering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageBounds {
    #[serde(default = "default_min_usage")]
    pub min: f64,

    #[serde(default = "default_usage_cap")]
    pub cap: f64,
}

fn default_min_usage() -> f64 {
    0.5
}

fn default_usage_cap() -> f64 {
    95.0
}

impl Default for UsageBounds {
    fn default() -> Self {
        Self {
            min: default_min_usage(),
            cap: default_usage_cap(),
        }
    }
}

/// Clamp range for a score-based mode. Performance is `clamped / ceiling`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub floor: f64,
    pub ceiling: f64,
}

fn default_cycle_cap() -> f64 {
    10.0
}

fn default_pure_fiction_range() -> ScoreRange {
    ScoreRange {
        floor: 23000.0,
        ceiling: 40000.0,
    }
}

fn default_apocalyptic_shadow_range() -> ScoreRange {
    ScoreRange {
        floor: 3100.0,
        ceiling: 4000.0,
    }
}

/// Share of viable characters placed in each ranked tier. D takes the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct TierRatios {
    #[serde(default = "default_ratio_s")]
    pub s: f64,

    #[serde(default = "default_ratio_a")]
    pub a: f64,

    #[serde(default = "default_ratio_b")]
    pub b: f64,

    #[serde(default = "default_ratio_c")]
    pub c: f64,
}

fn default_ratio_s() -> f64 {
    0.1
}

fn default_ratio_a() -> f64 {
    0.2
}

fn default_ratio_b() -> f64 {
    0.3
}

fn default_ratio_c() -> f64 {
    0.3
}

impl Default for TierRatios {
    fn default() -> Self {
        Self {
            s: default_ratio_s(),
            a: default_ratio_a(),
            b: default_ratio_b(),
            c: default_ratio_c(),
        }
    }
}

impl TierRatios {
    /// Ratios in fill order (S, A, B, C).
    pub fn as_array(&self) -> [f64; 4] {
        [self.s, self.a, self.b, self.c]
    }
}

/// Every constant the scoring and tiering engine uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Cycles at or above this count score zero performance
    #[serde(default = "default_cycle_cap")]
    pub cycle_cap: f64,

    #[serde(default)]
    pub weights: Weights,

    #[serde(default)]
    pub usage: UsageBounds,

    #[serde(default = "default_pure_fiction_range")]
    pub pure_fiction: ScoreRange,

    #[serde(default = "default_apocalyptic_shadow_range")]
    pub apocalyptic_shadow: ScoreRange,

    #[serde(default)]
    pub tier_ratios: TierRatios,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cycle_cap: default_cycle_cap(),
            weights: Weights::default(),
            usage: UsageBounds::default(),
            pure_fiction: default_pure_fiction_range(),
            apocalyptic_shadow: default_apocalyptic_shadow_range(),
            tier_ratios: TierRatios::default(),
        }
    }
}

impl ScoringConfig {
    /// Validate the scoring constants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Weights { performance, usage } = self.weights;
        if !performance.is_finite() || !usage.is_finite() || performance < 0.0 || usage < 0.0 {
            return Err(ConfigError::ValidationError(
                "Weights must be finite and non-negative".to_string(),
            ));
        }
        if ((performance + usage) - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::ValidationError(format!(
                "Weights must sum to 1.0 (got {})",
                performance + usage
            )));
        }

        let UsageBounds { min, cap } = self.usage;
        if !(0.0..=100.0).contains(&min) || !(0.0..=100.0).contains(&cap) || min > cap {
            return Err(ConfigError::ValidationError(format!(
                "Usage bounds must satisfy 0 <= min <= cap <= 100 (got min={}, cap={})",
                min, cap
            )));
        }

        if !self.cycle_cap.is_finite() || self.cycle_cap <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Cycle cap must be finite and greater than 0".to_string(),
            ));
        }

        for (name, range) in [
            ("pure_fiction", self.pure_fiction),
            ("apocalyptic_shadow", self.apocalyptic_shadow),
        ] {
            let ordered = range.floor > 0.0 && range.floor <= range.ceiling;
            if !ordered || !range.ceiling.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "Score range {} must satisfy 0 < floor <= ceiling < inf",
                    name
                )));
            }
        }

        let ratios = self.tier_ratios.as_array();
        if ratios.iter().any(|r| !(0.0..=1.0).contains(r)) {
            return Err(ConfigError::ValidationError(
                "Tier ratios must each lie in [0, 1]".to_string(),
            ));
        }
        let total: f64 = ratios.iter().sum();
        if total > 1.0 + WEIGHT_SUM_EPSILON {
            return Err(ConfigError::ValidationError(format!(
                "Tier ratios must not sum past 1.0 (got {})",
                total
            )));
        }

        Ok(())
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub scoring: ScoringConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()
    }
}
