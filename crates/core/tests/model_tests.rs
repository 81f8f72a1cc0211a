// ═══════════════════════════════════════════════════════════════════
// Model Tests — AssetCategory, Multiplier, EffectSet, GrowthRateState,
// MarketEvent, Portfolio, SimulationConfig, QuoteKey, FreshnessPolicy
// ═══════════════════════════════════════════════════════════════════

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

use investsim_core::errors::CoreError;
use investsim_core::models::category::AssetCategory;
use investsim_core::models::config::{FiringPolicy, ScheduledFiring, SimulationConfig, TickStep};
use investsim_core::models::effect::{EffectSet, Multiplier};
use investsim_core::models::event::MarketEvent;
use investsim_core::models::growth::GrowthRateState;
use investsim_core::models::portfolio::{normalize_allocation, Allocation, Portfolio};
use investsim_core::models::quote::{CachedQuote, FreshnessPolicy, QuoteKey, QuoteKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── AssetCategory ───────────────────────────────────────────────────

mod asset_category {
    use super::*;

    #[test]
    fn all_is_in_canonical_order() {
        assert_eq!(
            AssetCategory::ALL,
            [
                AssetCategory::Equity,
                AssetCategory::Bonds,
                AssetCategory::RealEstate,
                AssetCategory::Banks,
                AssetCategory::Other,
            ]
        );
    }

    #[test]
    fn display() {
        assert_eq!(AssetCategory::RealEstate.to_string(), "Real Estate");
        assert_eq!(AssetCategory::Banks.to_string(), "Banks");
    }

    #[test]
    fn serializes_as_document_key() {
        for category in AssetCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }

    #[test]
    fn parse_accepts_separator_and_case_variants() {
        for input in ["realEstate", "real_estate", "Real Estate", "REAL-ESTATE"] {
            assert_eq!(input.parse::<AssetCategory>().unwrap(), AssetCategory::RealEstate);
        }
    }

    #[test]
    fn parse_unknown_category_fails() {
        let err = "crypto".parse::<AssetCategory>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }
}

// ── Multiplier & EffectSet ──────────────────────────────────────────

mod effect_set {
    use super::*;

    #[test]
    fn multiplier_serializes_with_upper_case_fields() {
        let json = serde_json::to_string(&Multiplier::new(1.1, 1.0)).unwrap();
        assert_eq!(json, r#"{"X":1.1,"Y":1.0}"#);
    }

    #[test]
    fn multiplier_default_is_neutral() {
        assert_eq!(Multiplier::default(), Multiplier::NEUTRAL);
        assert_eq!(Multiplier::scale(0.9), Multiplier::new(0.9, 1.0));
    }

    #[test]
    fn from_factors_maps_canonical_order() {
        let set = EffectSet::from_factors(0.9, 1.1, 0.95, 1.05, 1.0);
        assert_eq!(set.x(AssetCategory::Equity), Some(0.9));
        assert_eq!(set.x(AssetCategory::Bonds), Some(1.1));
        assert_eq!(set.x(AssetCategory::RealEstate), Some(0.95));
        assert_eq!(set.x(AssetCategory::Banks), Some(1.05));
        assert_eq!(set.x(AssetCategory::Other), Some(1.0));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn neutral_validates() {
        assert!(EffectSet::neutral().validate().is_ok());
    }

    #[test]
    fn empty_set_is_incomplete() {
        let set = EffectSet::new();
        assert!(set.is_empty());
        match set.validate().unwrap_err() {
            CoreError::IncompleteEffectSet { category } => assert_eq!(category, "Equity"),
            other => panic!("Expected IncompleteEffectSet, got {:?}", other),
        }
    }

    #[test]
    fn missing_category_is_reported() {
        let set = EffectSet::uniform(1.1).without(AssetCategory::Banks);
        match set.validate().unwrap_err() {
            CoreError::IncompleteEffectSet { category } => assert_eq!(category, "Banks"),
            other => panic!("Expected IncompleteEffectSet, got {:?}", other),
        }
    }

    #[test]
    fn zero_multiplier_rejected() {
        let set = EffectSet::neutral().with(AssetCategory::Bonds, Multiplier::scale(0.0));
        assert!(matches!(
            set.validate(),
            Err(CoreError::InvalidMultiplier { value, .. }) if value == 0.0
        ));
    }

    #[test]
    fn negative_and_non_finite_multipliers_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let set = EffectSet::neutral().with(AssetCategory::Other, Multiplier::scale(bad));
            assert!(matches!(set.validate(), Err(CoreError::InvalidMultiplier { .. })));
        }
    }

    #[test]
    fn y_is_not_validated() {
        let set = EffectSet::neutral().with(AssetCategory::Equity, Multiplier::new(1.1, -3.0));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn json_shape_is_category_keyed() {
        let json = serde_json::to_value(EffectSet::uniform(1.1)).unwrap();
        assert_eq!(json["realEstate"]["X"], 1.1);
        assert_eq!(json["banks"]["Y"], 1.0);
    }
}

// ── GrowthRateState ─────────────────────────────────────────────────

mod growth_rate_state {
    use super::*;

    #[test]
    fn neutral_covers_every_category() {
        let state = GrowthRateState::neutral();
        let rates: Vec<_> = state.iter().collect();
        assert_eq!(rates.len(), 5);
        assert!(rates.iter().all(|(_, m)| *m == Multiplier::NEUTRAL));
        assert_eq!(GrowthRateState::default(), state);
    }

    #[test]
    fn with_rate_replaces_one_category() {
        let state = GrowthRateState::neutral().with_rate(AssetCategory::Equity, Multiplier::new(1.21, 1.0));
        assert_eq!(state.x(AssetCategory::Equity), 1.21);
        assert_eq!(state.x(AssetCategory::Bonds), 1.0);
        assert_eq!(state.y(AssetCategory::Equity), 1.0);
    }

    #[test]
    fn missing_category_reads_neutral() {
        let state: GrowthRateState = serde_json::from_str(r#"{"equity":{"X":0.9,"Y":1.0}}"#).unwrap();
        assert_eq!(state.x(AssetCategory::Equity), 0.9);
        assert_eq!(state.get(AssetCategory::Other), Multiplier::NEUTRAL);
    }
}

// ── MarketEvent ─────────────────────────────────────────────────────

mod market_event {
    use super::*;

    #[test]
    fn catalog_has_fourteen_distinct_events() {
        let names: std::collections::HashSet<_> = MarketEvent::ALL.iter().map(|e| e.name()).collect();
        assert_eq!(names.len(), 14);
    }

    #[test]
    fn catalog_index_follows_declaration_order() {
        for (i, event) in MarketEvent::ALL.iter().enumerate() {
            assert_eq!(event.catalog_index(), i);
        }
        assert_eq!(MarketEvent::QuantitativeEasing.catalog_index(), 0);
        assert_eq!(MarketEvent::InterestRateHike.catalog_index(), 13);
    }

    #[test]
    fn from_name_accepts_short_and_long_forms() {
        assert_eq!(
            MarketEvent::from_name("CybersecurityBreach"),
            Some(MarketEvent::CybersecurityBreach)
        );
        assert_eq!(
            MarketEvent::from_name("CybersecurityBreachImpactingBanks"),
            Some(MarketEvent::CybersecurityBreach)
        );
        assert_eq!(
            MarketEvent::from_name("interest_rate_hike"),
            Some(MarketEvent::InterestRateHike)
        );
    }

    #[test]
    fn from_name_rejects_unknown_and_empty() {
        assert_eq!(MarketEvent::from_name("Meteor"), None);
        assert_eq!(MarketEvent::from_name(""), None);
        assert_eq!(MarketEvent::from_name(" - _"), None);
    }

    #[test]
    fn parse_unknown_is_unknown_event() {
        match "Meteor".parse::<MarketEvent>().unwrap_err() {
            CoreError::UnknownEvent(name) => assert_eq!(name, "Meteor"),
            other => panic!("Expected UnknownEvent, got {:?}", other),
        }
    }

    #[test]
    fn serde_uses_short_name_and_accepts_long_alias() {
        let json = serde_json::to_string(&MarketEvent::InflationSpike).unwrap();
        assert_eq!(json, "\"InflationSpike\"");
        let event: MarketEvent = serde_json::from_str("\"SuddenInflationSpike\"").unwrap();
        assert_eq!(event, MarketEvent::InflationSpike);
    }

    #[test]
    fn display_is_short_name() {
        assert_eq!(MarketEvent::TaxReform.to_string(), "TaxReform");
        assert_eq!(MarketEvent::TaxReform.long_name(), "TaxReformFavoringCorporateProfits");
    }
}

// ── Portfolio ───────────────────────────────────────────────────────

mod portfolio {
    use super::*;

    #[test]
    fn missing_categories_start_at_zero() {
        let allocation: Allocation = [(AssetCategory::Equity, 1000.0)].into_iter().collect();
        let portfolio = Portfolio::from_allocation(&allocation).unwrap();
        assert_eq!(portfolio.balances.len(), 5);
        assert_eq!(portfolio.balance(AssetCategory::Equity), 1000.0);
        assert_eq!(portfolio.balance(AssetCategory::Banks), 0.0);
        assert_eq!(portfolio.total_value(), 1000.0);
        assert_eq!(portfolio.growth_rates, GrowthRateState::neutral());
    }

    #[test]
    fn negative_balance_rejected() {
        let allocation: Allocation = [(AssetCategory::Bonds, -1.0)].into_iter().collect();
        match Portfolio::from_allocation(&allocation).unwrap_err() {
            CoreError::InvalidInitialAllocation { category, amount } => {
                assert_eq!(category, "Bonds");
                assert_eq!(amount, -1.0);
            }
            other => panic!("Expected InvalidInitialAllocation, got {:?}", other),
        }
    }

    #[test]
    fn non_finite_balance_rejected() {
        let allocation: Allocation = [(AssetCategory::Other, f64::INFINITY)].into_iter().collect();
        assert!(matches!(
            normalize_allocation(&allocation),
            Err(CoreError::InvalidInitialAllocation { .. })
        ));
    }

    #[test]
    fn zero_allocation_is_valid() {
        let portfolio = Portfolio::from_allocation(&Allocation::new()).unwrap();
        assert_eq!(portfolio.total_value(), 0.0);
    }
}

// ── SimulationConfig ────────────────────────────────────────────────

mod simulation_config {
    use super::*;

    fn base() -> SimulationConfig {
        SimulationConfig {
            run_id: Some("run-1".into()),
            start_date: date(2024, 1, 31),
            step: TickStep::Monthly,
            horizon: 12,
            initial_allocation: [(AssetCategory::Equity, 1000.0)].into_iter().collect(),
            firing: FiringPolicy::Quiet,
            currency: "USD".into(),
        }
    }

    #[test]
    fn tick_dates_are_anchored_on_start() {
        let start = date(2024, 1, 31);
        assert_eq!(TickStep::Monthly.date_of_tick(start, 1), Some(date(2024, 2, 29)));
        assert_eq!(TickStep::Monthly.date_of_tick(start, 2), Some(date(2024, 3, 31)));
        assert_eq!(TickStep::Quarterly.date_of_tick(start, 1), Some(date(2024, 4, 30)));
        assert_eq!(TickStep::Quarterly.date_of_tick(start, 4), Some(date(2025, 1, 31)));
    }

    #[test]
    fn tick_step_months() {
        assert_eq!(TickStep::Monthly.months(), 1);
        assert_eq!(TickStep::Quarterly.months(), 3);
        assert_eq!(TickStep::Quarterly.to_string(), "quarterly");
    }

    #[test]
    fn minimal_json_uses_defaults() {
        let config = SimulationConfig::from_json_str(r#"{"start_date":"2024-01-01","horizon":6}"#).unwrap();
        assert_eq!(config.step, TickStep::Monthly);
        assert_eq!(config.firing, FiringPolicy::Quiet);
        assert_eq!(config.currency, "USD");
        assert!(config.run_id.is_none());
        assert!(config.initial_allocation.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_scheduled_policy() {
        let json = r#"{
            "start_date": "2024-01-01",
            "step": "quarterly",
            "horizon": 4,
            "initial_allocation": {"equity": 1000, "realEstate": 500},
            "firing": {"kind": "scheduled", "schedule": [
                {"tick": 1, "events": ["QuantitativeEasing", "CybersecurityBreachImpactingBanks"]}
            ]}
        }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(config.step, TickStep::Quarterly);
        assert_eq!(config.initial_allocation[&AssetCategory::RealEstate], 500.0);
        match &config.firing {
            FiringPolicy::Scheduled { schedule } => {
                assert_eq!(schedule.len(), 1);
                assert_eq!(schedule[0].events.len(), 2);
            }
            other => panic!("Expected scheduled policy, got {:?}", other),
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_random_policy() {
        let json = r#"{
            "start_date": "2024-01-01",
            "horizon": 4,
            "firing": {"kind": "random", "seed": 7, "probabilities": {"NaturalDisaster": 0.25}}
        }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert!(matches!(config.firing, FiringPolicy::Random { seed: 7, .. }));
    }

    #[test]
    fn json_roundtrip() {
        let config = base();
        let back = SimulationConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn zero_horizon_rejected() {
        let config = SimulationConfig { horizon: 0, ..base() };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn calendar_overflow_rejected() {
        let config = SimulationConfig {
            start_date: NaiveDate::MAX,
            horizon: 1,
            ..base()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn blank_run_id_rejected() {
        let config = SimulationConfig {
            run_id: Some("  ".into()),
            ..base()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn bad_currency_rejected() {
        for currency in ["US", "USDT", "U$D", ""] {
            let config = SimulationConfig {
                currency: currency.into(),
                ..base()
            };
            assert!(
                matches!(config.validate(), Err(CoreError::InvalidConfig(_))),
                "currency {currency:?} should be rejected"
            );
        }
    }

    #[test]
    fn negative_allocation_rejected() {
        let config = SimulationConfig {
            initial_allocation: [(AssetCategory::Banks, -5.0)].into_iter().collect(),
            ..base()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidInitialAllocation { .. })
        ));
    }

    #[test]
    fn unknown_scheduled_event_rejected() {
        let config = SimulationConfig {
            firing: FiringPolicy::Scheduled {
                schedule: vec![ScheduledFiring {
                    tick: 2,
                    events: vec!["Meteor".into()],
                }],
            },
            ..base()
        };
        assert!(matches!(config.validate(), Err(CoreError::UnknownEvent(_))));
    }

    #[test]
    fn scheduled_tick_out_of_range_rejected() {
        for tick in [0, 13] {
            let config = SimulationConfig {
                firing: FiringPolicy::Scheduled {
                    schedule: vec![ScheduledFiring {
                        tick,
                        events: vec!["NaturalDisaster".into()],
                    }],
                },
                ..base()
            };
            assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
        }
    }

    #[test]
    fn probability_out_of_range_rejected() {
        let mut probabilities = BTreeMap::new();
        probabilities.insert("NaturalDisaster".to_string(), 1.5);
        let config = SimulationConfig {
            firing: FiringPolicy::Random { probabilities, seed: 1 },
            ..base()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn unknown_random_event_rejected() {
        let mut probabilities = BTreeMap::new();
        probabilities.insert("Meteor".to_string(), 0.5);
        let config = SimulationConfig {
            firing: FiringPolicy::Random { probabilities, seed: 1 },
            ..base()
        };
        assert!(matches!(config.validate(), Err(CoreError::UnknownEvent(_))));
    }

    #[test]
    fn load_from_missing_file_is_file_io() {
        let result = SimulationConfig::load_from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(CoreError::FileIO(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, base().to_json().unwrap()).unwrap();
        assert_eq!(SimulationConfig::load_from_file(&path).unwrap(), base());
    }
}

// ── Quotes ──────────────────────────────────────────────────────────

mod quotes {
    use super::*;

    #[test]
    fn stock_key_is_uppercased() {
        let key = QuoteKey::stock(" aapl ");
        assert_eq!(key.symbol, "AAPL");
        assert_eq!(key.kind, QuoteKind::Stock);
        assert_eq!(key.collection(), "stock_quotes");
        assert_eq!(key.document_key(), "AAPL");
        assert!(key.currencies().is_none());
    }

    #[test]
    fn pair_key() {
        let key = QuoteKey::pair("usd", "gbp");
        assert_eq!(key.symbol, "USD-GBP");
        assert_eq!(key.collection(), "conversion_rates");
        assert_eq!(key.currencies(), Some(("USD", "GBP")));
        assert_eq!(key.to_string(), "ConversionRate:USD-GBP");
    }

    #[test]
    fn malformed_pair_has_no_currencies() {
        let key = QuoteKey {
            kind: QuoteKind::ConversionRate,
            symbol: "USDGBP".into(),
        };
        assert!(key.currencies().is_none());
    }

    #[test]
    fn cached_quote_document_shape() {
        let quote = CachedQuote {
            value: 0.79,
            last_updated_date: date(2025, 3, 1),
        };
        let json = serde_json::to_value(quote).unwrap();
        assert_eq!(json["value"], 0.79);
        assert_eq!(json["lastUpdatedDate"], "2025-03-01");
    }

    #[test]
    fn default_policy_is_same_day() {
        let policy = FreshnessPolicy::default();
        let today = date(2025, 3, 10);
        assert!(policy.is_fresh(today, today));
        assert!(!policy.is_fresh(date(2025, 3, 9), today));
    }

    #[test]
    fn future_stamp_is_not_fresh() {
        let policy = FreshnessPolicy::default();
        assert!(!policy.is_fresh(date(2025, 3, 11), date(2025, 3, 10)));
    }

    #[test]
    fn longer_policy() {
        let policy = FreshnessPolicy::new(Duration::days(7));
        let today = date(2025, 3, 10);
        assert!(policy.is_fresh(date(2025, 3, 4), today));
        assert!(!policy.is_fresh(date(2025, 3, 3), today));
    }
}
