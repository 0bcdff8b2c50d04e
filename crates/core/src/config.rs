use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading or validating an [`IndicatorConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Window lengths and parameters for an indicator report.
///
/// Every field is optional in the TOML file; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_period: usize,
    pub ema_period: usize,
    /// Wilder period. Needs `14 * rsi_period + 1` closes.
    pub rsi_period: usize,
    /// Needs `3 * steep_period + 5` closes.
    pub steep_period: usize,
    /// Spacing for the latest percentage change.
    pub change_period: usize,
    /// Fraction in `[0, 1]`.
    pub quantile: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_period: 20,
            ema_period: 20,
            rsi_period: 14,
            steep_period: 20,
            change_period: 1,
            quantile: 0.5,
        }
    }
}

impl IndicatorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded indicator config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("sma_period", self.sma_period),
            ("ema_period", self.ema_period),
            ("rsi_period", self.rsi_period),
            ("steep_period", self.steep_period),
            ("change_period", self.change_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be > 0")));
        }
        if !(0.0..=1.0).contains(&self.quantile) {
            return Err(ConfigError::Invalid(format!(
                "quantile must be within [0, 1], got {}",
                self.quantile
            )));
        }
        Ok(())
    }
}
