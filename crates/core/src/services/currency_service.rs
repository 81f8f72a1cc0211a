use crate::errors::CoreError;
use crate::models::portfolio::Allocation;
use crate::models::quote::QuoteKey;
use crate::storage::document_store::DocumentStore;
use super::quote_service::QuoteService;

/// Converts amounts between fiat currencies.
///
/// Rates come from [`QuoteService`], so they are cached per pair and
/// refreshed at most once per freshness window. A simulation never
/// converts mid-run: the caller resolves one rate up front and applies it
/// to the whole allocation with [`CurrencyService::convert_allocation`].
pub struct CurrencyService;

impl CurrencyService {
    pub fn new() -> Self {
        Self
    }

    /// Convert `amount` of `from_currency` into `to_currency`.
    /// E.g., convert(1000.0, "USD", "GBP") → ~790.0
    pub async fn convert(
        &self,
        quotes: &QuoteService,
        store: &dyn DocumentStore,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<f64, CoreError> {
        let from = from_currency.trim().to_uppercase();
        let to = to_currency.trim().to_uppercase();

        if from == to {
            return Ok(amount);
        }

        let rate = quotes
            .get_fresh_rate(store, &QuoteKey::pair(&from, &to))
            .await?;

        Ok(amount * rate)
    }

    /// Scale every category of `allocation` by an already-resolved `rate`.
    pub fn convert_allocation(&self, allocation: &Allocation, rate: f64) -> Result<Allocation, CoreError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "conversion rate must be finite and positive, got {rate}"
            )));
        }
        Ok(allocation
            .iter()
            .map(|(category, amount)| (*category, amount * rate))
            .collect())
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}
