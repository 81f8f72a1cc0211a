use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// What a cached quote measures. Determines which providers can fetch it
/// and which collection it is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteKind {
    /// Latest traded price of a listed company (AAPL, MSFT, ...)
    Stock,
    /// Exchange rate between two fiat currencies (USD-GBP, ...)
    ConversionRate,
}

impl QuoteKind {
    /// Document-store collection holding quotes of this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            QuoteKind::Stock => "stock_quotes",
            QuoteKind::ConversionRate => "conversion_rates",
        }
    }
}

impl std::fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteKind::Stock => write!(f, "Stock"),
            QuoteKind::ConversionRate => write!(f, "ConversionRate"),
        }
    }
}

/// Identifies one cached quote: a stock symbol or a `BASE-QUOTE` currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteKey {
    pub kind: QuoteKind,
    /// Uppercased symbol, e.g. "AAPL" or "USD-GBP"
    pub symbol: String,
}

impl QuoteKey {
    pub fn stock(symbol: impl Into<String>) -> Self {
        Self {
            kind: QuoteKind::Stock,
            symbol: symbol.into().trim().to_uppercase(),
        }
    }

    /// Conversion rate: how many `quote` units one `base` unit buys.
    pub fn pair(base: &str, quote: &str) -> Self {
        Self {
            kind: QuoteKind::ConversionRate,
            symbol: format!("{}-{}", base.trim().to_uppercase(), quote.trim().to_uppercase()),
        }
    }

    /// Split a conversion pair into (base, quote). `None` for stock keys
    /// or malformed pairs.
    pub fn currencies(&self) -> Option<(&str, &str)> {
        if self.kind != QuoteKind::ConversionRate {
            return None;
        }
        let (base, quote) = self.symbol.split_once('-')?;
        if base.is_empty() || quote.is_empty() {
            return None;
        }
        Some((base, quote))
    }

    pub fn collection(&self) -> &'static str {
        self.kind.collection()
    }

    /// Document key in the store.
    pub fn document_key(&self) -> &str {
        &self.symbol
    }
}

impl std::fmt::Display for QuoteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.symbol)
    }
}

/// A quote as stored in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedQuote {
    pub value: f64,
    pub last_updated_date: NaiveDate,
}

/// How old a cached quote may get before it must be re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub max_age: Duration,
}

impl FreshnessPolicy {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// A quote stamped `last_updated` is fresh on `today` when it is not
    /// from the future and is younger than `max_age`. With the default one
    /// day this means "fetched today".
    pub fn is_fresh(&self, last_updated: NaiveDate, today: NaiveDate) -> bool {
        let age = today.signed_duration_since(last_updated);
        age >= Duration::zero() && age < self.max_age
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(Duration::days(1))
    }
}
