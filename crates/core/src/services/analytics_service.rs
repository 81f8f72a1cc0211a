use std::collections::BTreeMap;

use crate::models::analytics::{CategoryPerformance, RunSummary, ValuePoint};
use crate::models::category::AssetCategory;
use crate::models::run::SimulationRun;

/// Computes results-screen analytics for a finished run: value change,
/// returns, per-category breakdown and event statistics.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Summarize a run.
    ///
    /// Computes:
    /// - Initial and final totals, absolute change, % return
    /// - Per-category change, % return, final growth rate and allocation share
    /// - How often each event fired
    ///
    /// Percentages are `None` where the starting amount is zero.
    pub fn summarize(&self, run: &SimulationRun) -> RunSummary {
        let initial_total = run.initial_total();
        let final_total = run.final_total();
        let absolute_change = final_total - initial_total;

        let categories = AssetCategory::ALL
            .iter()
            .map(|&category| {
                let initial_balance = run.initial_balances.get(&category).copied().unwrap_or(0.0);
                let final_balance = run.final_balances.get(&category).copied().unwrap_or(0.0);
                let change = final_balance - initial_balance;
                CategoryPerformance {
                    category,
                    initial_balance,
                    final_balance,
                    change,
                    return_pct: percent_of(change, initial_balance),
                    final_growth_rate: run
                        .last_snapshot()
                        .map(|s| s.growth_rates.x(category))
                        .unwrap_or(1.0),
                    allocation_pct: percent_of(final_balance, final_total).unwrap_or(0.0),
                }
            })
            .collect();

        let mut event_counts = BTreeMap::new();
        for event in run.snapshots.iter().flat_map(|s| s.fired_events.iter()) {
            *event_counts.entry(*event).or_insert(0) += 1;
        }

        RunSummary {
            run_id: run.run_id.clone(),
            ticks: run.len(),
            start_date: run.start_date,
            end_date: run.end_date(),
            initial_total,
            final_total,
            absolute_change,
            return_pct: percent_of(absolute_change, initial_total),
            categories,
            event_counts,
        }
    }

    /// Total portfolio value per tick, starting with tick 0 (the initial allocation).
    pub fn value_series(&self, run: &SimulationRun) -> Vec<ValuePoint> {
        std::iter::once(ValuePoint {
            tick: 0,
            date: run.start_date,
            total_value: run.initial_total(),
        })
        .chain(run.snapshots.iter().map(|s| ValuePoint {
            tick: s.tick,
            date: s.date,
            total_value: s.total_value(),
        }))
        .collect()
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

fn percent_of(part: f64, whole: f64) -> Option<f64> {
    (whole > 0.0).then(|| part / whole * 100.0)
}
