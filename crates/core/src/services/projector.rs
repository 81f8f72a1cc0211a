use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::category::AssetCategory;
use crate::models::config::SimulationConfig;
use crate::models::portfolio::{Allocation, Portfolio};
use crate::models::growth::GrowthRateState;
use crate::models::run::{SimulationRun, Snapshot};
use super::clock::SimulationClock;
use super::effect_table::EventEffectTable;
use super::growth_adjuster::GrowthRateAdjuster;

/// Lifecycle of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectorState {
    /// Created, no tick applied yet
    Initialized,
    /// At least one tick applied, horizon not reached
    Running,
    /// Horizon reached; the portfolio is read-only
    Completed,
    /// A tick overflowed; nothing from it was committed and no further
    /// tick can be applied
    Aborted,
}

/// Owns a portfolio for one run and projects it forward tick by tick.
///
/// Per tick: ask the clock which events fire, fold their effect sets into
/// the growth rates in firing order, compound every balance by its X and
/// append a snapshot. A tick is all-or-nothing: rates and balances are
/// computed into temporaries and committed only when every event applied
/// and every value is finite. The clock does not move when event selection
/// fails; a numeric overflow aborts the run for good.
///
/// No I/O happens here; persisting the finished run is the caller's job.
pub struct PortfolioProjector<'a> {
    table: &'a EventEffectTable,
    adjuster: GrowthRateAdjuster,
    clock: SimulationClock,
    portfolio: Portfolio,
    run: SimulationRun,
    state: ProjectorState,
    failure: Option<(u32, AssetCategory, f64)>,
}

impl std::fmt::Debug for PortfolioProjector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioProjector")
            .field("run_id", &self.run.run_id)
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("snapshots", &self.run.snapshots.len())
            .finish()
    }
}

impl<'a> PortfolioProjector<'a> {
    /// Rejects the allocation with `InvalidInitialAllocation` before any tick.
    pub fn new(
        table: &'a EventEffectTable,
        clock: SimulationClock,
        allocation: &Allocation,
        run_id: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let portfolio = Portfolio::from_allocation(allocation)?;
        let run = SimulationRun {
            run_id: run_id.into(),
            step: clock.step(),
            start_date: clock.start_date(),
            initial_balances: portfolio.balances.clone(),
            snapshots: Vec::with_capacity(clock.horizon() as usize),
            final_balances: portfolio.balances.clone(),
        };
        Ok(Self {
            table,
            adjuster: GrowthRateAdjuster::new(),
            clock,
            portfolio,
            run,
            state: ProjectorState::Initialized,
            failure: None,
        })
    }

    /// Validate the configuration and set up a projector for it.
    pub fn from_config(table: &'a EventEffectTable, config: &SimulationConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let clock = SimulationClock::from_config(config)?;
        let run_id = config
            .run_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Self::new(table, clock, &config.initial_allocation, run_id)
    }

    pub fn state(&self) -> ProjectorState {
        self.state
    }

    pub fn run_id(&self) -> &str {
        &self.run.run_id
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.run.snapshots
    }

    /// Ticks committed to the series so far.
    pub fn ticks_elapsed(&self) -> u32 {
        self.run.snapshots.len() as u32
    }

    pub fn horizon(&self) -> u32 {
        self.clock.horizon()
    }

    /// Apply one tick and return its snapshot.
    ///
    /// Calling this after the run completed is a contract violation and
    /// fails with `HorizonExceeded`. A tick whose rates or balances leave
    /// the finite range fails with `NumericOverflow` and aborts the run.
    pub fn advance(&mut self) -> Result<&Snapshot, CoreError> {
        if let Some((tick, category, value)) = self.failure {
            return Err(overflow(tick, category, value));
        }
        if self.state == ProjectorState::Completed {
            return Err(CoreError::HorizonExceeded {
                horizon: self.clock.horizon(),
            });
        }
        if self.state == ProjectorState::Initialized {
            info!(
                run_id = %self.run.run_id,
                horizon = self.clock.horizon(),
                step = %self.clock.step(),
                policy = self.clock.policy_name(),
                "simulation started"
            );
        }

        let tick = self.clock.advance()?;

        let rates = self.adjuster.apply_all(
            &self.portfolio.growth_rates,
            tick.fired_events.iter().map(|e| self.table.effects(*e)),
        )?;

        let balances: BTreeMap<AssetCategory, f64> = AssetCategory::ALL
            .into_iter()
            .map(|c| (c, self.portfolio.balance(c) * rates.x(c)))
            .collect();

        if let Some((category, value)) = out_of_range(&rates, &balances) {
            warn!(
                run_id = %self.run.run_id,
                tick = tick.tick,
                category = %category,
                value,
                "simulation aborted on numeric overflow"
            );
            self.state = ProjectorState::Aborted;
            self.failure = Some((tick.tick, category, value));
            return Err(overflow(tick.tick, category, value));
        }

        debug!(
            run_id = %self.run.run_id,
            tick = tick.tick,
            date = %tick.date,
            events = ?tick.fired_events,
            total = balances.values().sum::<f64>(),
            remaining = self.clock.remaining(),
            "tick applied"
        );

        self.portfolio.growth_rates = rates.clone();
        self.portfolio.balances = balances.clone();
        self.run.final_balances = balances.clone();
        self.run.snapshots.push(Snapshot {
            tick: tick.tick,
            date: tick.date,
            balances,
            growth_rates: rates,
            fired_events: tick.fired_events,
        });

        self.state = if self.clock.is_finished() {
            info!(
                run_id = %self.run.run_id,
                ticks = self.run.snapshots.len(),
                final_total = self.portfolio.total_value(),
                "simulation completed"
            );
            ProjectorState::Completed
        } else {
            ProjectorState::Running
        };

        Ok(&self.run.snapshots[self.run.snapshots.len() - 1])
    }

    /// Drive ticks until the horizon and hand back the finished run.
    /// Any failing tick aborts the whole run; no partial series escapes.
    pub fn run_to_completion(mut self) -> Result<SimulationRun, CoreError> {
        while self.state != ProjectorState::Completed {
            self.advance()?;
        }
        self.into_run()
    }

    /// The finished run. Fails with `RunIncomplete` before the horizon.
    pub fn into_run(self) -> Result<SimulationRun, CoreError> {
        if self.state != ProjectorState::Completed {
            return Err(CoreError::RunIncomplete {
                completed: self.ticks_elapsed(),
                horizon: self.clock.horizon(),
            });
        }
        Ok(self.run)
    }
}

/// First category whose X is not a positive normal float or whose balance
/// is not finite.
fn out_of_range(
    rates: &GrowthRateState,
    balances: &BTreeMap<AssetCategory, f64>,
) -> Option<(AssetCategory, f64)> {
    AssetCategory::ALL.into_iter().find_map(|c| {
        let x = rates.x(c);
        if !x.is_normal() || x < 0.0 {
            return Some((c, x));
        }
        let balance = balances.get(&c).copied().unwrap_or(0.0);
        (!balance.is_finite()).then_some((c, balance))
    })
}

fn overflow(tick: u32, category: AssetCategory, value: f64) -> CoreError {
    CoreError::NumericOverflow {
        tick,
        category: category.to_string(),
        value,
    }
}
