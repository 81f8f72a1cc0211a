use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use super::event::MarketEvent;
use super::portfolio::{normalize_allocation, Allocation};

/// Length of one simulated tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickStep {
    Monthly,
    Quarterly,
}

impl TickStep {
    pub fn months(&self) -> u32 {
        match self {
            TickStep::Monthly => 1,
            TickStep::Quarterly => 3,
        }
    }

    /// Calendar date of tick `tick` for a run anchored at `start`.
    ///
    /// Computed from the anchor rather than the previous tick so month-end
    /// clamping (Jan 31 → Feb 28) never drifts later ticks.
    pub fn date_of_tick(&self, start: NaiveDate, tick: u32) -> Option<NaiveDate> {
        let months = self.months().checked_mul(tick)?;
        start.checked_add_months(Months::new(months))
    }
}

impl std::fmt::Display for TickStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickStep::Monthly => write!(f, "monthly"),
            TickStep::Quarterly => write!(f, "quarterly"),
        }
    }
}

/// One entry of an explicit event schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledFiring {
    /// 1-based tick on which the events fire
    pub tick: u32,
    /// Event names, applied in the listed order
    pub events: Vec<String>,
}

/// How events get selected on each tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FiringPolicy {
    /// Nothing ever fires; balances compound at the neutral rate.
    #[default]
    Quiet,
    /// Every event is drawn independently each tick with its own probability.
    Random {
        probabilities: BTreeMap<String, f64>,
        seed: u64,
    },
    /// Events fire exactly on the configured ticks.
    Scheduled { schedule: Vec<ScheduledFiring> },
}

/// Everything needed to start a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Run / group identifier. A random UUID is used when absent.
    #[serde(default)]
    pub run_id: Option<String>,

    pub start_date: NaiveDate,

    #[serde(default = "default_step")]
    pub step: TickStep,

    /// Number of ticks to simulate (at least one)
    pub horizon: u32,

    #[serde(default)]
    pub initial_allocation: Allocation,

    #[serde(default)]
    pub firing: FiringPolicy,

    /// Currency the allocation is denominated in (e.g. "USD", "GBP")
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_step() -> TickStep {
    TickStep::Monthly
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            run_id: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            step: default_step(),
            horizon: 12,
            initial_allocation: Allocation::new(),
            firing: FiringPolicy::Quiet,
            currency: default_currency(),
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON. Does not validate.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize config: {e}")))
    }

    /// Reject anything that would make the run fail part-way through.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.horizon == 0 {
            return Err(CoreError::InvalidConfig("horizon must be at least one tick".into()));
        }
        if self.step.date_of_tick(self.start_date, self.horizon).is_none() {
            return Err(CoreError::InvalidConfig(format!(
                "horizon of {} {} ticks from {} overflows the calendar",
                self.horizon, self.step, self.start_date
            )));
        }
        if let Some(id) = &self.run_id {
            if id.trim().is_empty() {
                return Err(CoreError::InvalidConfig("run_id must not be blank".into()));
            }
        }
        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidConfig(format!(
                "Invalid currency code '{}': must be exactly 3 ASCII letters (e.g., USD, GBP)",
                self.currency
            )));
        }

        normalize_allocation(&self.initial_allocation)?;

        match &self.firing {
            FiringPolicy::Quiet => {}
            FiringPolicy::Random { probabilities, .. } => {
                for (name, p) in probabilities {
                    name.parse::<MarketEvent>()?;
                    if !p.is_finite() || !(0.0..=1.0).contains(p) {
                        return Err(CoreError::InvalidConfig(format!(
                            "probability for {name} must be within [0, 1], got {p}"
                        )));
                    }
                }
            }
            FiringPolicy::Scheduled { schedule } => {
                for entry in schedule {
                    if entry.tick == 0 || entry.tick > self.horizon {
                        return Err(CoreError::InvalidConfig(format!(
                            "scheduled tick {} is outside 1..={}",
                            entry.tick, self.horizon
                        )));
                    }
                    for name in &entry.events {
                        name.parse::<MarketEvent>()?;
                    }
                }
            }
        }
        Ok(())
    }
}
