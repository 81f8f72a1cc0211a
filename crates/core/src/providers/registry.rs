use std::collections::HashMap;

use crate::models::quote::QuoteKind;

use super::alphavantage::AlphaVantageProvider;
use super::finnhub::FinnhubProvider;
use super::frankfurter::FrankfurterProvider;
use super::freecurrency::FreeCurrencyApiProvider;
use super::traits::QuoteProvider;

/// API-key names understood by [`QuoteProviderRegistry::new_with_defaults`].
pub const FREECURRENCY_KEY: &str = "freecurrencyapi";
pub const FINNHUB_KEY: &str = "finnhub";
pub const ALPHAVANTAGE_KEY: &str = "alphavantage";

/// Registry of all available quote providers.
///
/// Routes requests by [`QuoteKind`]. Registration order is priority order:
/// the quote service tries providers front to back.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with every provider whose credentials are available.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        // FreeCurrencyAPI: conversion rates, requires API key (primary)
        if let Some(key) = api_keys.get(FREECURRENCY_KEY) {
            registry.register(Box::new(FreeCurrencyApiProvider::new(key.clone())));
        }

        // Frankfurter: conversion rates, no API key needed (fallback)
        registry.register(Box::new(FrankfurterProvider::new()));

        // Finnhub: stock quotes, requires API key (primary)
        if let Some(key) = api_keys.get(FINNHUB_KEY) {
            registry.register(Box::new(FinnhubProvider::new(key.clone())));
        }

        // Alpha Vantage: stock quotes, requires API key (fallback)
        if let Some(key) = api_keys.get(ALPHAVANTAGE_KEY) {
            registry.register(Box::new(AlphaVantageProvider::new(key.clone())));
        }

        registry
    }

    /// Register a new quote provider.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// Find the first provider that supports the given kind.
    pub fn get_provider_for(&self, kind: QuoteKind) -> Option<&dyn QuoteProvider> {
        self.providers
            .iter()
            .find(|p| p.supported_kinds().contains(&kind))
            .map(|p| p.as_ref())
    }

    /// All providers supporting `kind`, in priority order (used for fallback).
    pub fn get_providers_for(&self, kind: QuoteKind) -> Vec<&dyn QuoteProvider> {
        self.providers
            .iter()
            .filter(|p| p.supported_kinds().contains(&kind))
            .map(|p| p.as_ref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
