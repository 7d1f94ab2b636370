use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The biological role of a well on the plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Known-positive control (`K+`).
    PositiveControl,
    /// Negative control from healthy donors (`K- healthy`); calibrates the threshold.
    NegativeHealthy,
    /// Buffer-only negative control (`K- buffer`).
    NegativeBuffer,
    /// Substrate without sample; estimates background signal.
    SubstrateBlank,
    /// A test sample, or any well nobody categorized.
    #[default]
    Unassigned,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Unknown well category '{0}'. Expected one of: K+, K- healthy, K- buffer, substrate blank, sample."
)]
pub struct UnknownCategory(pub String);

// Keys are lowercase with surrounding whitespace removed.
static CATEGORY_ALIASES: Map<&'static str, Category> = phf_map! {
    "k+" => Category::PositiveControl,
    "kpos" => Category::PositiveControl,
    "pos" => Category::PositiveControl,
    "positive" => Category::PositiveControl,
    "positive-control" => Category::PositiveControl,
    "k- healthy" => Category::NegativeHealthy,
    "k-healthy" => Category::NegativeHealthy,
    "kneg-healthy" => Category::NegativeHealthy,
    "healthy" => Category::NegativeHealthy,
    "negative-healthy" => Category::NegativeHealthy,
    "k- buffer" => Category::NegativeBuffer,
    "k-buffer" => Category::NegativeBuffer,
    "kneg-buffer" => Category::NegativeBuffer,
    "buffer" => Category::NegativeBuffer,
    "negative-buffer" => Category::NegativeBuffer,
    "substrate blank" => Category::SubstrateBlank,
    "substrate-blank" => Category::SubstrateBlank,
    "blank" => Category::SubstrateBlank,
    "" => Category::Unassigned,
    "sample" => Category::Unassigned,
    "unassigned" => Category::Unassigned,
};

impl Category {
    pub const ALL: [Category; 5] = [
        Category::PositiveControl,
        Category::NegativeHealthy,
        Category::NegativeBuffer,
        Category::SubstrateBlank,
        Category::Unassigned,
    ];

    /// The label stored in the database and written to export sheets.
    pub fn as_label(&self) -> &'static str {
        match self {
            Category::PositiveControl => "K+",
            Category::NegativeHealthy => "K- healthy",
            Category::NegativeBuffer => "K- buffer",
            Category::SubstrateBlank => "substrate blank",
            Category::Unassigned => "",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the stored labels as well as the short command-line aliases
    /// (`kpos`, `kneg-healthy`, `kneg-buffer`, `blank`, ...), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        CATEGORY_ALIASES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_category_is_unassigned() {
        assert_eq!(Category::default(), Category::Unassigned);
    }

    #[test]
    fn stored_labels_parse_back_to_the_same_category() {
        for category in Category::ALL {
            assert_eq!(category.as_label().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn aliases_are_case_insensitive_and_trimmed() {
        assert_eq!(" KNEG-Healthy ".parse(), Ok(Category::NegativeHealthy));
        assert_eq!("Blank".parse(), Ok(Category::SubstrateBlank));
        assert_eq!("k+".parse(), Ok(Category::PositiveControl));
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert_eq!(
            "control".parse::<Category>(),
            Err(UnknownCategory("control".to_string()))
        );
    }
}
