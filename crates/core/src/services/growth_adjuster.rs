use crate::errors::CoreError;
use crate::models::category::AssetCategory;
use crate::models::effect::{EffectSet, Multiplier};
use crate::models::growth::GrowthRateState;

/// Folds event effect sets into a growth-rate state.
///
/// Pure business logic: no I/O, no randomness. X compounds
/// multiplicatively (`new.x = current.x * effect.x`); Y is carried
/// through unchanged.
pub struct GrowthRateAdjuster;

impl GrowthRateAdjuster {
    pub fn new() -> Self {
        Self
    }

    /// Apply one effect set. Fails with `IncompleteEffectSet` if any
    /// category is missing; `current` is never modified.
    pub fn apply(
        &self,
        current: &GrowthRateState,
        effects: &EffectSet,
    ) -> Result<GrowthRateState, CoreError> {
        let mut next = current.clone();
        for category in AssetCategory::ALL {
            let effect = effects.get(category).ok_or_else(|| CoreError::IncompleteEffectSet {
                category: category.to_string(),
            })?;
            let rate = current.get(category);
            next.set(category, Multiplier::new(rate.x * effect.x, rate.y));
        }
        Ok(next)
    }

    /// Apply several effect sets in order.
    pub fn apply_all<'a>(
        &self,
        current: &GrowthRateState,
        effects: impl IntoIterator<Item = &'a EffectSet>,
    ) -> Result<GrowthRateState, CoreError> {
        effects
            .into_iter()
            .try_fold(current.clone(), |rates, set| self.apply(&rates, set))
    }
}

impl Default for GrowthRateAdjuster {
    fn default() -> Self {
        Self::new()
    }
}
