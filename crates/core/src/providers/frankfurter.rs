use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::quote::{QuoteKey, QuoteKind};
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://api.frankfurter.dev/v1";
const PROVIDER: &str = "Frankfurter";

/// Frankfurter API provider for fiat conversion rates.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) reference rates.
/// - **Endpoint**: `/latest?base=USD&symbols=GBP`
pub struct FrankfurterProvider {
    client: Client,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Frankfurter API response types ──────────────────────────────────

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn supported_kinds(&self) -> Vec<QuoteKind> {
        vec![QuoteKind::ConversionRate]
    }

    async fn fetch_latest(&self, key: &QuoteKey) -> Result<f64, CoreError> {
        let (base, target) = key.currencies().ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Not a currency pair: {key}"),
        })?;

        // Same currency → rate is 1.0
        if base == target {
            return Ok(1.0);
        }

        let url = format!("{BASE_URL}/latest?base={base}&symbols={target}");

        let resp: RatesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse response for {base}/{target}: {e}"),
            })?;

        resp.rates.get(target).copied().ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No rate found for {base} → {target}"),
        })
    }
}
