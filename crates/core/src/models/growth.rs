use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::AssetCategory;
use super::effect::Multiplier;

/// Current per-tick growth multiplier for every category.
///
/// Starts neutral (X = 1, Y = 1) and is compounded by every applied event
/// for the lifetime of a run. A category absent from a deserialized state
/// reads as neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrowthRateState {
    rates: BTreeMap<AssetCategory, Multiplier>,
}

impl GrowthRateState {
    /// All categories at X = 1, Y = 1.
    pub fn neutral() -> Self {
        Self {
            rates: AssetCategory::ALL
                .into_iter()
                .map(|c| (c, Multiplier::NEUTRAL))
                .collect(),
        }
    }

    /// Replace the rate of one category. Builder style.
    pub fn with_rate(mut self, category: AssetCategory, multiplier: Multiplier) -> Self {
        self.rates.insert(category, multiplier);
        self
    }

    pub fn get(&self, category: AssetCategory) -> Multiplier {
        self.rates.get(&category).copied().unwrap_or(Multiplier::NEUTRAL)
    }

    pub fn x(&self, category: AssetCategory) -> f64 {
        self.get(category).x
    }

    pub fn y(&self, category: AssetCategory) -> f64 {
        self.get(category).y
    }

    pub(crate) fn set(&mut self, category: AssetCategory, multiplier: Multiplier) {
        self.rates.insert(category, multiplier);
    }

    /// Iterate all categories in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetCategory, Multiplier)> + '_ {
        AssetCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

impl Default for GrowthRateState {
    fn default() -> Self {
        Self::neutral()
    }
}
