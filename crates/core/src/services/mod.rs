pub mod analytics_service;
pub mod clock;
pub mod currency_service;
pub mod effect_table;
pub mod growth_adjuster;
pub mod projector;
pub mod quote_service;
