use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::{QuoteKey, QuoteKind};

/// A third-party source of stock quotes or conversion rates.
///
/// Each external API implements this trait; the quote service only ever
/// talks to the trait, so swapping or adding a provider touches nothing else.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which quote kinds this provider can fetch.
    fn supported_kinds(&self) -> Vec<QuoteKind>;

    /// Fetch the latest value for `key` (price for stocks, rate for pairs).
    async fn fetch_latest(&self, key: &QuoteKey) -> Result<f64, CoreError>;
}
