use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use super::category::AssetCategory;

/// Growth multiplier pair for a single category.
///
/// `x` is the multiplicative growth factor. `y` is an additive/reference
/// term that every catalog entry sets to 1; it is stored and carried
/// through untouched but has no effect on projected balances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multiplier {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

impl Multiplier {
    /// Leaves a growth rate unchanged when applied.
    pub const NEUTRAL: Multiplier = Multiplier { x: 1.0, y: 1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A multiplier with the given X and the reserved Y term at 1.
    pub const fn scale(x: f64) -> Self {
        Self { x, y: 1.0 }
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Per-category multiplier pairs produced by a market event.
///
/// An effect set is only usable once [`EffectSet::validate`] passes:
/// every [`AssetCategory`] present, every X finite and strictly positive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectSet {
    entries: BTreeMap<AssetCategory, Multiplier>,
}

impl EffectSet {
    /// An empty (and therefore incomplete) effect set.
    pub fn new() -> Self {
        Self::default()
    }

    /// X = 1, Y = 1 for every category.
    pub fn neutral() -> Self {
        Self::uniform(1.0)
    }

    /// The same X for every category.
    pub fn uniform(x: f64) -> Self {
        Self::from_factors(x, x, x, x, x)
    }

    /// Build a complete set from one X per category, in canonical order.
    pub fn from_factors(equity: f64, bonds: f64, real_estate: f64, banks: f64, other: f64) -> Self {
        let entries = [
            (AssetCategory::Equity, Multiplier::scale(equity)),
            (AssetCategory::Bonds, Multiplier::scale(bonds)),
            (AssetCategory::RealEstate, Multiplier::scale(real_estate)),
            (AssetCategory::Banks, Multiplier::scale(banks)),
            (AssetCategory::Other, Multiplier::scale(other)),
        ]
        .into_iter()
        .collect();
        Self { entries }
    }

    /// Set (or replace) the multiplier for one category. Builder style.
    pub fn with(mut self, category: AssetCategory, multiplier: Multiplier) -> Self {
        self.entries.insert(category, multiplier);
        self
    }

    /// Drop a category (mostly useful for exercising validation).
    pub fn without(mut self, category: AssetCategory) -> Self {
        self.entries.remove(&category);
        self
    }

    pub fn get(&self, category: AssetCategory) -> Option<Multiplier> {
        self.entries.get(&category).copied()
    }

    /// Shortcut for the X component of a category.
    pub fn x(&self, category: AssetCategory) -> Option<f64> {
        self.get(category).map(|m| m.x)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetCategory, Multiplier)> + '_ {
        self.entries.iter().map(|(c, m)| (*c, *m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check completeness against the closed category set and positivity of X.
    pub fn validate(&self) -> Result<(), CoreError> {
        for category in AssetCategory::ALL {
            let m = self.get(category).ok_or_else(|| CoreError::IncompleteEffectSet {
                category: category.to_string(),
            })?;
            if !m.x.is_finite() || m.x <= 0.0 {
                return Err(CoreError::InvalidMultiplier {
                    category: category.to_string(),
                    value: m.x,
                });
            }
        }
        Ok(())
    }
}
