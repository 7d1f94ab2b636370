use super::address::WellAddress;
use super::category::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Outcome of classifying a well against the plate threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellResult {
    Positive,
    Negative,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown well result '{0}'. Expected 'positive' or 'negative'.")]
pub struct UnknownResult(pub String);

impl WellResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            WellResult::Positive => "positive",
            WellResult::Negative => "negative",
        }
    }
}

impl fmt::Display for WellResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WellResult {
    type Err = UnknownResult;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" | "+" => Ok(WellResult::Positive),
            "negative" | "neg" | "-" => Ok(WellResult::Negative),
            _ => Err(UnknownResult(s.to_string())),
        }
    }
}

/// Parses a measured value typed by a user.
///
/// Empty, unparsable and non-finite text yields `None`; missing readings are tolerated data,
/// not errors.
pub fn parse_raw_value(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// One cell of the plate.
///
/// `normalized_value` and `result` are caches derived from the raw values and categories of the
/// whole plate. They are only written by the engine and are cleared by [`PlateTable`] whenever
/// an input they depend on changes.
///
/// [`PlateTable`]: super::plate::PlateTable
#[derive(Debug, Clone, PartialEq)]
pub struct WellRecord {
    address: WellAddress,
    pub(crate) sample_name: String,
    pub(crate) raw_value: Option<f64>,
    pub(crate) category: Category,
    pub(crate) label: Option<String>,
    pub(crate) normalized_value: Option<f64>,
    pub(crate) result: Option<WellResult>,
}

impl WellRecord {
    pub(crate) fn empty(address: WellAddress) -> Self {
        Self {
            address,
            sample_name: String::new(),
            raw_value: None,
            category: Category::Unassigned,
            label: None,
            normalized_value: None,
            result: None,
        }
    }

    pub fn address(&self) -> WellAddress {
        self.address
    }

    pub fn sample_name(&self) -> &str {
        &self.sample_name
    }

    pub fn raw_value(&self) -> Option<f64> {
        self.raw_value
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// The free-text annotation (e.g. a serum identifier) attached during category assignment.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn normalized_value(&self) -> Option<f64> {
        self.normalized_value
    }

    pub fn result(&self) -> Option<WellResult> {
        self.result
    }

    /// A well with neither a sample name nor a reading carries no user data.
    pub fn is_empty(&self) -> bool {
        self.sample_name.is_empty() && self.raw_value.is_none()
    }

    pub(crate) fn clear_derived(&mut self) {
        self.normalized_value = None;
        self.result = None;
    }
}
