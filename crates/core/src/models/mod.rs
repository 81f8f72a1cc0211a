pub mod analytics;
pub mod category;
pub mod config;
pub mod effect;
pub mod event;
pub mod growth;
pub mod portfolio;
pub mod quote;
pub mod run;
