use thiserror::Error;

/// Unified error type for the entire investsim-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Event Catalog ───────────────────────────────────────────────
    #[error("Unknown market event: {0}")]
    UnknownEvent(String),

    #[error("Effect set is missing category {category}")]
    IncompleteEffectSet { category: String },

    #[error("Invalid multiplier for {category}: {value} (must be finite and greater than zero)")]
    InvalidMultiplier { category: String, value: f64 },

    #[error("Event catalog entry {event} is invalid: {message}")]
    CatalogIntegrity { event: String, message: String },

    // ── Simulation ──────────────────────────────────────────────────
    #[error("Invalid initial allocation for {category}: {amount} (must be finite and non-negative)")]
    InvalidInitialAllocation { category: String, amount: f64 },

    /// Calling `advance()` on a completed run. This is a contract violation
    /// by the caller and must not be retried.
    #[error("Simulation horizon of {horizon} ticks already reached")]
    HorizonExceeded { horizon: u32 },

    /// A tick pushed a growth rate or balance out of the representable
    /// range (infinite, NaN, or X collapsing to zero). The run is aborted.
    #[error("Numeric overflow at tick {tick} for {category}: {value}")]
    NumericOverflow { tick: u32, category: String, value: f64 },

    #[error("Simulation run is not complete ({completed} of {horizon} ticks)")]
    RunIncomplete { completed: u32, horizon: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Storage ─────────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Document store error: {0}")]
    Storage(String),

    #[error("Document not found: {collection}/{key}")]
    DocumentNotFound { collection: String, key: String },

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No provider available for quote kind: {0}")]
    NoProvider(String),

    #[error("Quote not available for {key}: {reason}")]
    DataUnavailable { key: String, reason: String },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters: provider URLs carry API keys.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
