use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::quote::{CachedQuote, FreshnessPolicy, QuoteKey, QuoteKind};
use crate::providers::registry::QuoteProviderRegistry;
use crate::storage::document_store::{from_document, to_document, DocumentStore};

/// Stock symbols refreshed by the daily quote job.
pub const TRACKED_COMPANIES: [&str; 17] = [
    "AMZN", "AAPL", "BCS", "BA", "KO", "DIS", "IBM", "MSFT", "NKE", "NVDA", "PFE", "RBLX",
    "SHEL", "SPOT", "TSLA", "V", "WMT",
];

/// Serves stock quotes and conversion rates through a document-store cache.
///
/// Cache strategy:
/// - **Fresh** (younger than the policy's max age): served from the store.
/// - **Missing or stale**: fetched from the providers for the key's kind,
///   in registration order, and written back to the store.
/// - **All providers failing**: a stale cached value is still served
///   (logged as a warning); with nothing cached the call fails.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
    policy: FreshnessPolicy,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self::with_policy(registry, FreshnessPolicy::default())
    }

    pub fn with_policy(registry: QuoteProviderRegistry, policy: FreshnessPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    /// Check if at least one provider is available for a given kind.
    pub fn has_provider_for(&self, kind: QuoteKind) -> bool {
        self.registry.get_provider_for(kind).is_some()
    }

    /// Get the names of all providers available for a given kind.
    pub fn get_provider_names(&self, kind: QuoteKind) -> Vec<String> {
        self.registry
            .get_providers_for(kind)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Latest value for `key`, using today's (UTC) date for freshness.
    pub async fn get_fresh_rate(&self, store: &dyn DocumentStore, key: &QuoteKey) -> Result<f64, CoreError> {
        let today = chrono::Utc::now().date_naive();
        self.get_fresh_rate_on(store, key, today).await
    }

    /// Latest value for `key` as seen on `today`.
    pub async fn get_fresh_rate_on(
        &self,
        store: &dyn DocumentStore,
        key: &QuoteKey,
        today: NaiveDate,
    ) -> Result<f64, CoreError> {
        let cached = self.read_cached(store, key).await?;

        if let Some(quote) = cached {
            if self.policy.is_fresh(quote.last_updated_date, today) {
                debug!(%key, value = quote.value, "quote cache hit");
                return Ok(quote.value);
            }
        }

        match self.fetch_and_store(store, key, today).await {
            Ok(value) => Ok(value),
            Err(e) => match cached {
                Some(stale) => {
                    warn!(
                        %key,
                        value = stale.value,
                        last_updated = %stale.last_updated_date,
                        error = %e,
                        "serving stale quote, every provider failed"
                    );
                    Ok(stale.value)
                }
                None => Err(CoreError::DataUnavailable {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            },
        }
    }

    /// Re-fetch every key regardless of freshness and overwrite the cache.
    /// One result per key, in input order; a failing key does not stop the rest.
    pub async fn refresh_all(
        &self,
        store: &dyn DocumentStore,
        keys: &[QuoteKey],
    ) -> Vec<(QuoteKey, Result<f64, CoreError>)> {
        let today = chrono::Utc::now().date_naive();
        let mut results = Vec::with_capacity(keys.len());

        for key in keys {
            let result = self.fetch_and_store(store, key, today).await;
            if let Err(e) = &result {
                warn!(%key, error = %e, "quote refresh failed");
            }
            results.push((key.clone(), result));
        }

        let refreshed = results.iter().filter(|(_, r)| r.is_ok()).count();
        info!(refreshed, total = keys.len(), "quote refresh finished");
        results
    }

    /// A document that no longer parses is treated as a cache miss.
    async fn read_cached(&self, store: &dyn DocumentStore, key: &QuoteKey) -> Result<Option<CachedQuote>, CoreError> {
        let Some(document) = store.get(key.collection(), key.document_key()).await? else {
            return Ok(None);
        };
        match from_document::<CachedQuote>(document) {
            Ok(quote) => Ok(Some(quote)),
            Err(e) => {
                warn!(%key, error = %e, "ignoring unreadable cached quote");
                Ok(None)
            }
        }
    }

    async fn fetch_and_store(&self, store: &dyn DocumentStore, key: &QuoteKey, today: NaiveDate) -> Result<f64, CoreError> {
        let value = self.fetch(key).await?;
        let quote = CachedQuote {
            value,
            last_updated_date: today,
        };
        store
            .set(key.collection(), key.document_key(), to_document(&quote)?)
            .await?;
        debug!(%key, value, "quote cached");
        Ok(value)
    }

    /// Fetch from the providers for the key's kind with automatic fallback.
    ///
    /// Values must be finite and strictly positive.
    async fn fetch(&self, key: &QuoteKey) -> Result<f64, CoreError> {
        let providers = self.registry.get_providers_for(key.kind);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(key.kind.to_string()));
        }

        let mut last_error = None;

        for provider in &providers {
            match provider.fetch_latest(key).await {
                Ok(value) => {
                    if !value.is_finite() || value <= 0.0 {
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!(
                                "Invalid value returned for {key}: {value} (must be finite and positive)"
                            ),
                        });
                        continue;
                    }
                    return Ok(value);
                }
                Err(e) => {
                    debug!(%key, provider = provider.name(), error = %e, "provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(key.kind.to_string())))
    }
}
