use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::quote::{QuoteKey, QuoteKind};
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

/// Alpha Vantage API provider for stock quotes.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (set as "alphavantage").
/// - **Strategy**: `GLOBAL_QUOTE` first; if that comes back empty, the
///   latest close of `TIME_SERIES_DAILY`.
///
/// Prices are in the stock's native currency (typically USD).
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }

    async fn fetch_global_quote(&self, symbol: &str) -> Result<Option<f64>, CoreError> {
        let resp: GlobalQuoteResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        match resp.global_quote.and_then(|q| q.price) {
            Some(price) => price.parse().map(Some).map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Invalid price format for {symbol}: {e}"),
            }),
            None => Ok(None),
        }
    }

    /// Close of the most recent trading day in the compact daily series.
    async fn fetch_latest_close(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp: TimeSeriesResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse time series for {symbol}: {e}"),
            })?;

        let series = resp.time_series.ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No time series data for {symbol}. API limit may be exceeded."),
        })?;

        // ISO dates sort lexicographically.
        let (_, latest) = series.iter().max_by(|a, b| a.0.cmp(b.0)).ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Empty time series for {symbol}"),
        })?;

        latest.close.parse().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Invalid close format for {symbol}: {e}"),
        })
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
}

#[derive(Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyData>>,
}

#[derive(Deserialize)]
struct DailyData {
    #[serde(rename = "4. close")]
    close: String,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn supported_kinds(&self) -> Vec<QuoteKind> {
        vec![QuoteKind::Stock]
    }

    async fn fetch_latest(&self, key: &QuoteKey) -> Result<f64, CoreError> {
        if key.kind != QuoteKind::Stock {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Unsupported quote kind for {key}"),
            });
        }
        let symbol = key.symbol.as_str();

        match self.fetch_global_quote(symbol).await? {
            Some(price) => Ok(price),
            None => self.fetch_latest_close(symbol).await,
        }
    }
}
