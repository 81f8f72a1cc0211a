//! Simulated calendar time and event selection.
//!
//! The clock decides *when* ticks happen and *which* events fire on them; it
//! knows nothing about portfolios. Selection is pluggable through
//! [`EventSelector`]:
//!
//! - [`QuietSelector`] never fires anything.
//! - [`ScheduledSelector`] fires the configured events on the configured
//!   ticks, in the order listed (entries for the same tick concatenate in
//!   configuration order).
//! - [`RandomSelector`] draws every event independently each tick from a
//!   seeded ChaCha20 stream. Events drawn in the same tick are simultaneous
//!   and fire in catalog order.

use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::config::{FiringPolicy, SimulationConfig, TickStep};
use crate::models::event::MarketEvent;

/// Outcome of advancing the clock by one step.
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// 1-based tick index
    pub tick: u32,
    pub date: NaiveDate,
    /// Events to apply this tick, in application order
    pub fired_events: Vec<MarketEvent>,
}

/// Chooses which events fire on a given tick.
pub trait EventSelector: Send {
    /// Short policy name (for logs).
    fn name(&self) -> &str;

    /// Events firing on `tick`, in application order.
    fn select(&mut self, tick: u32, date: NaiveDate) -> Result<Vec<MarketEvent>, CoreError>;
}

/// Build the selector described by a firing policy.
pub fn selector_for(policy: &FiringPolicy) -> Result<Box<dyn EventSelector>, CoreError> {
    Ok(match policy {
        FiringPolicy::Quiet => Box::new(QuietSelector),
        FiringPolicy::Random { probabilities, seed } => {
            Box::new(RandomSelector::from_names(probabilities, *seed)?)
        }
        FiringPolicy::Scheduled { schedule } => Box::new(ScheduledSelector::new(
            schedule.iter().map(|s| (s.tick, s.events.clone())),
        )),
    })
}

// ── Selectors ───────────────────────────────────────────────────────

pub struct QuietSelector;

impl EventSelector for QuietSelector {
    fn name(&self) -> &str {
        "quiet"
    }

    fn select(&mut self, _tick: u32, _date: NaiveDate) -> Result<Vec<MarketEvent>, CoreError> {
        Ok(Vec::new())
    }
}

/// Fires events from an explicit schedule of names.
///
/// Names are resolved when their tick comes up, so an unknown name aborts
/// the run at that tick with `UnknownEvent`.
pub struct ScheduledSelector {
    schedule: BTreeMap<u32, Vec<String>>,
}

impl ScheduledSelector {
    pub fn new(entries: impl IntoIterator<Item = (u32, Vec<String>)>) -> Self {
        let mut schedule: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for (tick, names) in entries {
            schedule.entry(tick).or_default().extend(names);
        }
        Self { schedule }
    }

    /// Convenience for already-typed schedules.
    pub fn from_events(entries: impl IntoIterator<Item = (u32, Vec<MarketEvent>)>) -> Self {
        Self::new(
            entries
                .into_iter()
                .map(|(tick, events)| (tick, events.iter().map(|e| e.name().to_string()).collect())),
        )
    }
}

impl EventSelector for ScheduledSelector {
    fn name(&self) -> &str {
        "scheduled"
    }

    fn select(&mut self, tick: u32, _date: NaiveDate) -> Result<Vec<MarketEvent>, CoreError> {
        match self.schedule.get(&tick) {
            Some(names) => names.iter().map(|n| n.parse()).collect(),
            None => Ok(Vec::new()),
        }
    }
}

/// Independent per-tick Bernoulli draw for each event.
pub struct RandomSelector {
    rng: ChaCha20Rng,
    /// Sorted in catalog order; the draw order is part of reproducibility.
    odds: Vec<(MarketEvent, f64)>,
}

impl RandomSelector {
    pub fn new(odds: impl IntoIterator<Item = (MarketEvent, f64)>, seed: u64) -> Result<Self, CoreError> {
        let mut by_event: BTreeMap<MarketEvent, f64> = BTreeMap::new();
        for (event, p) in odds {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(CoreError::InvalidConfig(format!(
                    "probability for {event} must be within [0, 1], got {p}"
                )));
            }
            if by_event.insert(event, p).is_some() {
                return Err(CoreError::InvalidConfig(format!(
                    "probability for {event} given more than once"
                )));
            }
        }
        Ok(Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            odds: by_event.into_iter().collect(),
        })
    }

    pub fn from_names(probabilities: &BTreeMap<String, f64>, seed: u64) -> Result<Self, CoreError> {
        let odds = probabilities
            .iter()
            .map(|(name, p)| Ok((name.parse::<MarketEvent>()?, *p)))
            .collect::<Result<Vec<_>, CoreError>>()?;
        Self::new(odds, seed)
    }
}

impl EventSelector for RandomSelector {
    fn name(&self) -> &str {
        "random"
    }

    fn select(&mut self, _tick: u32, _date: NaiveDate) -> Result<Vec<MarketEvent>, CoreError> {
        let mut fired = Vec::new();
        for (event, p) in &self.odds {
            // Draw for every event, even p = 0, so the stream stays aligned.
            if self.rng.random_bool(*p) {
                fired.push(*event);
            }
        }
        Ok(fired)
    }
}

// ── Clock ───────────────────────────────────────────────────────────

/// Advances simulated time in fixed steps up to a horizon.
pub struct SimulationClock {
    start_date: NaiveDate,
    step: TickStep,
    horizon: u32,
    elapsed: u32,
    selector: Box<dyn EventSelector>,
}

impl std::fmt::Debug for SimulationClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationClock")
            .field("start_date", &self.start_date)
            .field("step", &self.step)
            .field("horizon", &self.horizon)
            .field("elapsed", &self.elapsed)
            .field("selector", &self.selector.name())
            .finish()
    }
}

impl SimulationClock {
    pub fn new(
        start_date: NaiveDate,
        step: TickStep,
        horizon: u32,
        selector: Box<dyn EventSelector>,
    ) -> Result<Self, CoreError> {
        if horizon == 0 {
            return Err(CoreError::InvalidConfig("horizon must be at least one tick".into()));
        }
        if step.date_of_tick(start_date, horizon).is_none() {
            return Err(CoreError::InvalidConfig(format!(
                "horizon of {horizon} {step} ticks from {start_date} overflows the calendar"
            )));
        }
        Ok(Self {
            start_date,
            step,
            horizon,
            elapsed: 0,
            selector,
        })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, CoreError> {
        let selector = selector_for(&config.firing)?;
        Self::new(config.start_date, config.step, config.horizon, selector)
    }

    /// Move one step forward and report which events fire.
    ///
    /// Fails with `HorizonExceeded` once the horizon has been reached. If
    /// event selection fails the clock does not move.
    pub fn advance(&mut self) -> Result<TickResult, CoreError> {
        if self.is_finished() {
            return Err(CoreError::HorizonExceeded { horizon: self.horizon });
        }
        let tick = self.elapsed + 1;
        let date = self.step.date_of_tick(self.start_date, tick).ok_or_else(|| {
            CoreError::InvalidConfig(format!("tick {tick} overflows the calendar"))
        })?;
        let fired_events = self.selector.select(tick, date)?;
        self.elapsed = tick;
        Ok(TickResult {
            tick,
            date,
            fired_events,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.horizon
    }

    pub fn ticks_elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn remaining(&self) -> u32 {
        self.horizon - self.elapsed
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn step(&self) -> TickStep {
        self.step
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Date of the last completed tick (the start date before the first).
    pub fn current_date(&self) -> NaiveDate {
        self.step
            .date_of_tick(self.start_date, self.elapsed)
            .unwrap_or(self.start_date)
    }

    pub fn policy_name(&self) -> &str {
        self.selector.name()
    }
}
