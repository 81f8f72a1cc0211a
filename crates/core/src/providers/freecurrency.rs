use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::quote::{QuoteKey, QuoteKind};
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://api.freecurrencyapi.com/v1/latest";
const PROVIDER: &str = "FreeCurrencyAPI";

/// FreeCurrencyAPI provider for fiat conversion rates.
///
/// - **Free tier**: 5,000 requests/month.
/// - **Requires**: API key (set as "freecurrencyapi").
/// - **Endpoint**: `/v1/latest?base_currency=USD&currencies=GBP`
pub struct FreeCurrencyApiProvider {
    client: Client,
    api_key: String,
}

impl FreeCurrencyApiProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct LatestResponse {
    data: Option<HashMap<String, f64>>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for FreeCurrencyApiProvider {
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

        if base == target {
            return Ok(1.0);
        }

        let resp: LatestResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("currencies", target),
                ("base_currency", base),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse response for {base}/{target}: {e}"),
            })?;

        resp.data
            .and_then(|rates| rates.get(target).copied())
            .ok_or_else(|| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No rate found for {base} → {target}"),
            })
    }
}
