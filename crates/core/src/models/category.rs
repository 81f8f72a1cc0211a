use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// One of the five fixed portfolio buckets.
///
/// The set is closed: every effect set and growth-rate state must carry an
/// entry for each variant. Declaration order is the canonical iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetCategory {
    /// Shares / stock market holdings
    Equity,
    /// Government and corporate bonds
    Bonds,
    /// Property holdings
    RealEstate,
    /// Bank deposits and savings accounts
    Banks,
    /// Anything not covered above
    Other,
}

impl AssetCategory {
    /// Every category, in canonical order.
    pub const ALL: [AssetCategory; 5] = [
        AssetCategory::Equity,
        AssetCategory::Bonds,
        AssetCategory::RealEstate,
        AssetCategory::Banks,
        AssetCategory::Other,
    ];

    /// The key used for this category in stored documents and config files.
    pub fn key(&self) -> &'static str {
        match self {
            AssetCategory::Equity => "equity",
            AssetCategory::Bonds => "bonds",
            AssetCategory::RealEstate => "realEstate",
            AssetCategory::Banks => "banks",
            AssetCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetCategory::Equity => write!(f, "Equity"),
            AssetCategory::Bonds => write!(f, "Bonds"),
            AssetCategory::RealEstate => write!(f, "Real Estate"),
            AssetCategory::Banks => write!(f, "Banks"),
            AssetCategory::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for AssetCategory {
    type Err = CoreError;

    /// Accepts `realEstate`, `real_estate`, `Real Estate`, `REALESTATE`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        AssetCategory::ALL
            .into_iter()
            .find(|c| normalize_name(c.key()) == wanted)
            .ok_or_else(|| CoreError::InvalidConfig(format!("Unknown asset category '{s}'")))
    }
}

/// Lowercase and drop separators, so `Real Estate` == `real_estate` == `realEstate`.
pub(crate) fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
