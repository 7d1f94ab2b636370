use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Multiplier used when none is given or the given text does not parse.
pub const DEFAULT_MULTIPLIER: f64 = 1.0;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error(
        "Unknown threshold method '{0}'. Expected 'standard-deviation' (sd) or 'multiplier' (x)."
    )]
    UnknownMethod(String),
}

/// How the classification threshold is derived from the negative-control population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdMethod {
    /// `mean + multiplier * sample standard deviation`.
    StandardDeviation,
    /// `mean * multiplier`.
    Multiplier,
}

impl fmt::Display for ThresholdMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMethod::StandardDeviation => f.write_str("standard-deviation"),
            ThresholdMethod::Multiplier => f.write_str("multiplier"),
        }
    }
}

impl FromStr for ThresholdMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard-deviation" | "standard_deviation" | "sd" | "std" | "stddev" => {
                Ok(ThresholdMethod::StandardDeviation)
            }
            "multiplier" | "mult" | "x" => Ok(ThresholdMethod::Multiplier),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

/// Parses a user-typed multiplier, falling back to [`DEFAULT_MULTIPLIER`].
pub fn multiplier_from_text(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            debug!(
                "Multiplier text '{}' is not a number; using {}",
                text, DEFAULT_MULTIPLIER
            );
            DEFAULT_MULTIPLIER
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationConfig {
    pub method: ThresholdMethod,
    pub multiplier: f64,
}

#[derive(Default)]
pub struct ClassificationConfigBuilder {
    method: Option<ThresholdMethod>,
    multiplier: Option<f64>,
}

impl ClassificationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: ThresholdMethod) -> Self {
        self.method = Some(method);
        self
    }
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }
    pub fn multiplier_text(mut self, text: &str) -> Self {
        self.multiplier = Some(multiplier_from_text(text));
        self
    }

    /// The method is required; a missing multiplier defaults to [`DEFAULT_MULTIPLIER`].
    pub fn build(self) -> Result<ClassificationConfig, ConfigError> {
        Ok(ClassificationConfig {
            method: self
                .method
                .ok_or(ConfigError::MissingParameter("method"))?,
            multiplier: self
                .multiplier
                .filter(|m| m.is_finite())
                .unwrap_or(DEFAULT_MULTIPLIER),
        })
    }
}
