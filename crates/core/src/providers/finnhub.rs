use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::quote::{QuoteKey, QuoteKind};
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://finnhub.io/api/v1/quote";
const PROVIDER: &str = "Finnhub";

/// Finnhub API provider for stock quotes.
///
/// - **Free tier**: 60 requests/minute.
/// - **Requires**: API key (set as "finnhub").
/// - **Endpoint**: `/quote?symbol=AAPL` returns `{c, h, l, o, pc}`.
///
/// Uses the current price `c`. Finnhub answers unknown symbols with an
/// all-zero quote, which is reported as an error.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
}

impl FinnhubProvider {
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
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Previous close
    pc: Option<f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for FinnhubProvider {
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

        let resp: QuoteResponse = self
            .client
            .get(BASE_URL)
            .query(&[("symbol", symbol), ("token", self.api_key.as_str())])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        // Outside trading hours `c` can be 0 while `pc` still holds the last close.
        [resp.c, resp.pc]
            .into_iter()
            .flatten()
            .find(|price| *price > 0.0)
            .ok_or_else(|| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No quote for {symbol}. Symbol may be unknown."),
            })
    }
}
