pub mod registry;
pub mod traits;

// API provider implementations
pub mod alphavantage;
pub mod finnhub;
pub mod frankfurter;
pub mod freecurrency;
