pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::collections::HashMap;
use std::sync::Arc;

use models::{
    analytics::{RunSummary, ValuePoint},
    config::SimulationConfig,
    quote::QuoteKey,
    run::SimulationRun,
};
use providers::registry::QuoteProviderRegistry;
use services::{
    analytics_service::AnalyticsService,
    currency_service::CurrencyService,
    effect_table::EventEffectTable,
    projector::PortfolioProjector,
    quote_service::{QuoteService, TRACKED_COMPANIES},
};
use storage::{document_store::DocumentStore, runs::RunArchive};

use errors::CoreError;

/// Main entry point for the investment simulator core library.
/// Holds the event catalog, the document store and all services needed
/// to run, persist and analyze simulations.
#[must_use]
pub struct MarketSimulator {
    catalog: &'static EventEffectTable,
    store: Arc<dyn DocumentStore>,
    quote_service: QuoteService,
    currency_service: CurrencyService,
    analytics_service: AnalyticsService,
    archive: RunArchive,
    api_keys: HashMap<String, String>,
}

impl std::fmt::Debug for MarketSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketSimulator")
            .field("events", &self.catalog.len())
            .field("store", &self.store.name())
            .field("api_keys", &self.api_keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MarketSimulator {
    /// Create a simulator over `store`, registering every quote provider
    /// whose API key is present in `api_keys`.
    pub fn new(store: Arc<dyn DocumentStore>, api_keys: HashMap<String, String>) -> Self {
        let registry = QuoteProviderRegistry::new_with_defaults(&api_keys);
        let mut simulator = Self::with_registry(store, registry);
        simulator.api_keys = api_keys;
        simulator
    }

    /// Create a simulator with an explicit provider registry.
    pub fn with_registry(store: Arc<dyn DocumentStore>, registry: QuoteProviderRegistry) -> Self {
        Self {
            catalog: EventEffectTable::global(),
            store,
            quote_service: QuoteService::new(registry),
            currency_service: CurrencyService::new(),
            analytics_service: AnalyticsService::new(),
            archive: RunArchive::new(),
            api_keys: HashMap::new(),
        }
    }

    /// The built-in event catalog.
    pub fn catalog(&self) -> &'static EventEffectTable {
        self.catalog
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    // ── Simulation ──────────────────────────────────────────────────

    /// Validate `config` and return a projector ready for its first tick.
    /// Use this to step through a run interactively.
    pub fn start(&self, config: &SimulationConfig) -> Result<PortfolioProjector<'static>, CoreError> {
        PortfolioProjector::from_config(self.catalog, config)
    }

    /// Run a simulation from its initial allocation up to the horizon.
    pub fn run(&self, config: &SimulationConfig) -> Result<SimulationRun, CoreError> {
        self.start(config)?.run_to_completion()
    }

    /// Run a simulation and persist the finished run under its run id.
    /// Nothing is written if the run fails.
    pub async fn run_and_persist(&self, config: &SimulationConfig) -> Result<SimulationRun, CoreError> {
        let run = self.run(config)?;
        self.archive.save(self.store.as_ref(), &run).await?;
        Ok(run)
    }

    /// Load a previously persisted run.
    pub async fn load_run(&self, run_id: &str) -> Result<Option<SimulationRun>, CoreError> {
        self.archive.load(self.store.as_ref(), run_id).await
    }

    // ── Analytics ───────────────────────────────────────────────────

    #[must_use]
    pub fn summarize(&self, run: &SimulationRun) -> RunSummary {
        self.analytics_service.summarize(run)
    }

    #[must_use]
    pub fn value_series(&self, run: &SimulationRun) -> Vec<ValuePoint> {
        self.analytics_service.value_series(run)
    }

    // ── Quotes & Currencies ─────────────────────────────────────────

    /// Latest stock price or conversion rate, served from the cache when fresh.
    pub async fn get_fresh_rate(&self, key: &QuoteKey) -> Result<f64, CoreError> {
        self.quote_service.get_fresh_rate(self.store.as_ref(), key).await
    }

    /// Convert an amount between two fiat currencies.
    pub async fn convert(&self, amount: f64, from_currency: &str, to_currency: &str) -> Result<f64, CoreError> {
        self.currency_service
            .convert(&self.quote_service, self.store.as_ref(), amount, from_currency, to_currency)
            .await
    }

    /// Re-express a config's initial allocation in `currency`.
    ///
    /// The rate is resolved once, here; the returned config then runs
    /// without touching any provider.
    pub async fn localize(&self, config: &SimulationConfig, currency: &str) -> Result<SimulationConfig, CoreError> {
        let target = currency.trim().to_uppercase();
        let mut localized = config.clone();
        if config.currency.eq_ignore_ascii_case(&target) {
            return Ok(localized);
        }
        let rate = self
            .quote_service
            .get_fresh_rate(self.store.as_ref(), &QuoteKey::pair(&config.currency, &target))
            .await?;
        localized.initial_allocation = self
            .currency_service
            .convert_allocation(&config.initial_allocation, rate)?;
        localized.currency = target;
        Ok(localized)
    }

    /// Re-fetch the quotes of every tracked company. One result per symbol.
    pub async fn refresh_tracked_quotes(&self) -> Vec<(QuoteKey, Result<f64, CoreError>)> {
        let keys: Vec<QuoteKey> = TRACKED_COMPANIES.iter().map(|s| QuoteKey::stock(*s)).collect();
        self.quote_service.refresh_all(self.store.as_ref(), &keys).await
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Set an API key for a provider (e.g., "finnhub", "alphavantage").
    /// Rebuilds the provider registry so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.api_keys.insert(provider, key);
        let registry = QuoteProviderRegistry::new_with_defaults(&self.api_keys);
        self.quote_service = QuoteService::with_policy(registry, self.quote_service.policy());
    }

    #[must_use]
    pub fn quote_service(&self) -> &QuoteService {
        &self.quote_service
    }
}
