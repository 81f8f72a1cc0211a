use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::AssetCategory;
use super::config::TickStep;
use super::event::MarketEvent;
use super::growth::GrowthRateState;

/// State of the portfolio right after one tick was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// 1-based tick index
    pub tick: u32,

    /// Calendar date the tick lands on
    pub date: NaiveDate,

    /// Balances after compounding
    pub balances: BTreeMap<AssetCategory, f64>,

    /// Growth rates after this tick's events were folded in
    pub growth_rates: GrowthRateState,

    /// Events that fired during this tick, in application order
    pub fired_events: Vec<MarketEvent>,
}

impl Snapshot {
    pub fn balance(&self, category: AssetCategory) -> f64 {
        self.balances.get(&category).copied().unwrap_or(0.0)
    }

    pub fn total_value(&self) -> f64 {
        self.balances.values().sum()
    }
}

/// The output of one complete simulation: an append-only series of
/// snapshots from the first tick to the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRun {
    /// Run / group identifier; also the storage key
    pub run_id: String,

    pub step: TickStep,

    /// Date of tick 0 (the initial allocation)
    pub start_date: NaiveDate,

    pub initial_balances: BTreeMap<AssetCategory, f64>,

    pub snapshots: Vec<Snapshot>,

    /// Balances after the last tick
    pub final_balances: BTreeMap<AssetCategory, f64>,
}

impl SimulationRun {
    /// Number of ticks recorded.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Date of the final tick, or the start date for an empty run.
    pub fn end_date(&self) -> NaiveDate {
        self.snapshots.last().map(|s| s.date).unwrap_or(self.start_date)
    }

    pub fn initial_total(&self) -> f64 {
        self.initial_balances.values().sum()
    }

    pub fn final_total(&self) -> f64 {
        self.final_balances.values().sum()
    }
}
