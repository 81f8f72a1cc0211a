use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::AssetCategory;
use super::event::MarketEvent;

/// Results-screen summary of a finished simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,

    /// Number of ticks simulated
    pub ticks: usize,

    pub start_date: NaiveDate,

    /// Date of the last tick
    pub end_date: NaiveDate,

    /// Sum of the initial allocation
    pub initial_total: f64,

    /// Sum of balances after the last tick
    pub final_total: f64,

    /// final_total - initial_total
    pub absolute_change: f64,

    /// (absolute_change / initial_total) * 100, `None` when nothing was invested
    pub return_pct: Option<f64>,

    /// Per-category breakdown, in canonical category order
    pub categories: Vec<CategoryPerformance>,

    /// How often each event fired over the whole run
    pub event_counts: BTreeMap<MarketEvent, u32>,
}

/// Performance of a single asset category over a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: AssetCategory,

    pub initial_balance: f64,

    pub final_balance: f64,

    /// final_balance - initial_balance
    pub change: f64,

    /// `None` when the category started at zero
    pub return_pct: Option<f64>,

    /// Growth multiplier X in effect after the last tick
    pub final_growth_rate: f64,

    /// Share of the final total (0..=100)
    pub allocation_pct: f64,
}

/// Total portfolio value at one tick, for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    /// 0 for the initial allocation
    pub tick: u32,
    pub date: NaiveDate,
    pub total_value: f64,
}
