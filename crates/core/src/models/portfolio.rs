use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use super::category::AssetCategory;
use super::growth::GrowthRateState;

/// Starting balance per category. Categories left out start at zero.
pub type Allocation = BTreeMap<AssetCategory, f64>;

/// Live simulation state: one balance per category plus the growth rates
/// that will be applied on the next tick.
///
/// Owned exclusively by a single projector for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub balances: BTreeMap<AssetCategory, f64>,
    pub growth_rates: GrowthRateState,
}

impl Portfolio {
    /// Build from an initial allocation, rejecting negative or non-finite
    /// balances. Every category gets an entry (zero when not allocated).
    pub fn from_allocation(allocation: &Allocation) -> Result<Self, CoreError> {
        let balances = normalize_allocation(allocation)?;
        Ok(Self {
            balances,
            growth_rates: GrowthRateState::neutral(),
        })
    }

    pub fn balance(&self, category: AssetCategory) -> f64 {
        self.balances.get(&category).copied().unwrap_or(0.0)
    }

    /// Sum of all category balances.
    pub fn total_value(&self) -> f64 {
        self.balances.values().sum()
    }
}

/// Validate an allocation and fill in missing categories with zero.
pub fn normalize_allocation(allocation: &Allocation) -> Result<BTreeMap<AssetCategory, f64>, CoreError> {
    AssetCategory::ALL
        .into_iter()
        .map(|category| {
            let amount = allocation.get(&category).copied().unwrap_or(0.0);
            if !amount.is_finite() || amount < 0.0 {
                return Err(CoreError::InvalidInitialAllocation {
                    category: category.to_string(),
                    amount,
                });
            }
            Ok((category, amount))
        })
        .collect()
}
