use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::errors::CoreError;
use crate::models::effect::EffectSet;
use crate::models::event::MarketEvent;

static CATALOG: OnceLock<EventEffectTable> = OnceLock::new();

/// Immutable registry mapping every [`MarketEvent`] to its [`EffectSet`].
///
/// Each row is static data, validated once at construction: every event in
/// the catalog must be present and every effect set must cover the whole
/// category set with positive X. After that, lookups cannot fail for a
/// known event and the table is shared read-only across runs.
#[derive(Debug, Clone)]
pub struct EventEffectTable {
    effects: BTreeMap<MarketEvent, EffectSet>,
}

impl EventEffectTable {
    /// The process-wide built-in catalog, built and validated on first use.
    ///
    /// # Panics
    ///
    /// Panics if the built-in rows fail validation, which can only happen
    /// if the static data in [`EventEffectTable::builtin_rows`] is edited
    /// into an invalid state.
    pub fn global() -> &'static EventEffectTable {
        CATALOG.get_or_init(|| match Self::builtin() {
            Ok(table) => table,
            Err(e) => panic!("built-in market event catalog is invalid: {e}"),
        })
    }

    /// Build and validate a fresh copy of the built-in catalog.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_entries(Self::builtin_rows())
    }

    /// Build a table from arbitrary rows, applying the same validation as
    /// the built-in catalog. Duplicate rows: the last one wins.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (MarketEvent, EffectSet)>,
    ) -> Result<Self, CoreError> {
        let effects: BTreeMap<MarketEvent, EffectSet> = entries.into_iter().collect();

        for event in MarketEvent::ALL {
            let set = effects.get(&event).ok_or_else(|| CoreError::CatalogIntegrity {
                event: event.to_string(),
                message: "no effect set registered".into(),
            })?;
            set.validate().map_err(|e| CoreError::CatalogIntegrity {
                event: event.to_string(),
                message: e.to_string(),
            })?;
        }

        Ok(Self { effects })
    }

    /// Resolve an event by name (short or long form).
    pub fn resolve(&self, name: &str) -> Result<&EffectSet, CoreError> {
        let event: MarketEvent = name.parse()?;
        Ok(self.effects(event))
    }

    /// Effect set of a catalog event. Total: construction guarantees a row
    /// for every event.
    pub fn effects(&self, event: MarketEvent) -> &EffectSet {
        &self.effects[&event]
    }

    /// All rows in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (MarketEvent, &EffectSet)> + '_ {
        self.effects.iter().map(|(e, s)| (*e, s))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// The built-in rows: X per (equity, bonds, real estate, banks, other), Y = 1.
    pub fn builtin_rows() -> Vec<(MarketEvent, EffectSet)> {
        use MarketEvent::*;
        vec![
            (QuantitativeEasing, EffectSet::from_factors(1.1, 1.1, 1.1, 1.1, 1.1)),
            (CybersecurityBreach, EffectSet::from_factors(0.9, 0.9, 0.9, 0.9, 0.9)),
            (NaturalResourceDiscovery, EffectSet::from_factors(1.1, 1.1, 1.1, 1.1, 1.1)),
            (ConsumerConfidenceRise, EffectSet::from_factors(1.1, 1.1, 1.1, 1.1, 1.1)),
            (CorporateBankruptcy, EffectSet::from_factors(0.9, 0.9, 0.9, 0.9, 0.9)),
            (NaturalDisaster, EffectSet::from_factors(0.9, 0.9, 0.9, 0.9, 0.9)),
            (PoliticalInstability, EffectSet::from_factors(0.9, 1.1, 0.9, 0.9, 0.9)),
            (RealEstateBoom, EffectSet::from_factors(1.1, 0.9, 1.1, 1.1, 1.1)),
            (EnvironmentalRegulation, EffectSet::from_factors(0.9, 1.0, 0.9, 1.1, 0.9)),
            (InflationSpike, EffectSet::from_factors(0.9, 0.9, 1.1, 0.9, 0.9)),
            (TourismSurge, EffectSet::from_factors(1.1, 1.0, 1.1, 1.1, 1.1)),
            (TaxReform, EffectSet::from_factors(1.1, 1.0, 1.1, 1.1, 1.1)),
            (SectorDisruption, EffectSet::from_factors(1.1, 1.0, 1.1, 1.1, 1.1)),
            // Higher mortgage rates weigh on property; deposits earn a little more.
            (InterestRateHike, EffectSet::from_factors(0.9, 1.1, 0.95, 1.05, 1.0)),
        ]
    }
}
