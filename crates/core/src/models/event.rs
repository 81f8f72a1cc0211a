use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;
use super::category::normalize_name;

/// A named market event from the fixed catalog.
///
/// Events are stateless: what an event *does* lives in the
/// [`EventEffectTable`](crate::services::effect_table::EventEffectTable).
/// Declaration order is the catalog enumeration order and is used to break
/// ties between events that fire simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketEvent {
    #[serde(alias = "CentralBankImplementsQuantitativeEasing")]
    QuantitativeEasing,
    #[serde(alias = "CybersecurityBreachImpactingBanks")]
    CybersecurityBreach,
    #[serde(alias = "DiscoveryOfValuableNaturalResources")]
    NaturalResourceDiscovery,
    #[serde(alias = "IncreaseInConsumerConfidence")]
    ConsumerConfidenceRise,
    #[serde(alias = "MajorCorporationBankruptcy")]
    CorporateBankruptcy,
    NaturalDisaster,
    PoliticalInstability,
    RealEstateBoom,
    #[serde(alias = "StringentEnvironmentalRegulations")]
    EnvironmentalRegulation,
    #[serde(alias = "SuddenInflationSpike")]
    InflationSpike,
    #[serde(alias = "SurgeInGlobalTourism")]
    TourismSurge,
    #[serde(alias = "TaxReformFavoringCorporateProfits")]
    TaxReform,
    #[serde(alias = "TechnologicalDisruptionInASector")]
    SectorDisruption,
    InterestRateHike,
}

impl MarketEvent {
    /// The full catalog, in enumeration order.
    pub const ALL: [MarketEvent; 14] = [
        MarketEvent::QuantitativeEasing,
        MarketEvent::CybersecurityBreach,
        MarketEvent::NaturalResourceDiscovery,
        MarketEvent::ConsumerConfidenceRise,
        MarketEvent::CorporateBankruptcy,
        MarketEvent::NaturalDisaster,
        MarketEvent::PoliticalInstability,
        MarketEvent::RealEstateBoom,
        MarketEvent::EnvironmentalRegulation,
        MarketEvent::InflationSpike,
        MarketEvent::TourismSurge,
        MarketEvent::TaxReform,
        MarketEvent::SectorDisruption,
        MarketEvent::InterestRateHike,
    ];

    /// Short canonical name (also the serialized form).
    pub fn name(&self) -> &'static str {
        match self {
            MarketEvent::QuantitativeEasing => "QuantitativeEasing",
            MarketEvent::CybersecurityBreach => "CybersecurityBreach",
            MarketEvent::NaturalResourceDiscovery => "NaturalResourceDiscovery",
            MarketEvent::ConsumerConfidenceRise => "ConsumerConfidenceRise",
            MarketEvent::CorporateBankruptcy => "CorporateBankruptcy",
            MarketEvent::NaturalDisaster => "NaturalDisaster",
            MarketEvent::PoliticalInstability => "PoliticalInstability",
            MarketEvent::RealEstateBoom => "RealEstateBoom",
            MarketEvent::EnvironmentalRegulation => "EnvironmentalRegulation",
            MarketEvent::InflationSpike => "InflationSpike",
            MarketEvent::TourismSurge => "TourismSurge",
            MarketEvent::TaxReform => "TaxReform",
            MarketEvent::SectorDisruption => "SectorDisruption",
            MarketEvent::InterestRateHike => "InterestRateHike",
        }
    }

    /// Long descriptive name, accepted anywhere the short name is.
    pub fn long_name(&self) -> &'static str {
        match self {
            MarketEvent::QuantitativeEasing => "CentralBankImplementsQuantitativeEasing",
            MarketEvent::CybersecurityBreach => "CybersecurityBreachImpactingBanks",
            MarketEvent::NaturalResourceDiscovery => "DiscoveryOfValuableNaturalResources",
            MarketEvent::ConsumerConfidenceRise => "IncreaseInConsumerConfidence",
            MarketEvent::CorporateBankruptcy => "MajorCorporationBankruptcy",
            MarketEvent::NaturalDisaster => "NaturalDisaster",
            MarketEvent::PoliticalInstability => "PoliticalInstability",
            MarketEvent::RealEstateBoom => "RealEstateBoom",
            MarketEvent::EnvironmentalRegulation => "StringentEnvironmentalRegulations",
            MarketEvent::InflationSpike => "SuddenInflationSpike",
            MarketEvent::TourismSurge => "SurgeInGlobalTourism",
            MarketEvent::TaxReform => "TaxReformFavoringCorporateProfits",
            MarketEvent::SectorDisruption => "TechnologicalDisruptionInASector",
            MarketEvent::InterestRateHike => "InterestRateHike",
        }
    }

    /// Human-readable headline for display.
    pub fn title(&self) -> &'static str {
        match self {
            MarketEvent::QuantitativeEasing => "Central bank implements quantitative easing",
            MarketEvent::CybersecurityBreach => "Cybersecurity breach impacting banks",
            MarketEvent::NaturalResourceDiscovery => "Discovery of valuable natural resources",
            MarketEvent::ConsumerConfidenceRise => "Increase in consumer confidence",
            MarketEvent::CorporateBankruptcy => "Major corporation bankruptcy",
            MarketEvent::NaturalDisaster => "Natural disaster",
            MarketEvent::PoliticalInstability => "Political instability",
            MarketEvent::RealEstateBoom => "Real estate boom",
            MarketEvent::EnvironmentalRegulation => "Stringent environmental regulations",
            MarketEvent::InflationSpike => "Sudden inflation spike",
            MarketEvent::TourismSurge => "Surge in global tourism",
            MarketEvent::TaxReform => "Tax reform favoring corporate profits",
            MarketEvent::SectorDisruption => "Technological disruption in a sector",
            MarketEvent::InterestRateHike => "Interest rate hike",
        }
    }

    /// Position in the catalog enumeration (0-based).
    pub fn catalog_index(&self) -> usize {
        *self as usize
    }

    /// Resolve a name (short or long form, case and separator insensitive).
    pub fn from_name(name: &str) -> Option<MarketEvent> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }
        MarketEvent::ALL.into_iter().find(|e| {
            normalize_name(e.name()) == wanted || normalize_name(e.long_name()) == wanted
        })
    }
}

impl std::fmt::Display for MarketEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarketEvent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarketEvent::from_name(s).ok_or_else(|| CoreError::UnknownEvent(s.to_string()))
    }
}
