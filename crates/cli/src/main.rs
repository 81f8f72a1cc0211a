//! investsim CLI - run market-event simulations and manage the quote cache

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use investsim_core::models::config::SimulationConfig;
use investsim_core::models::quote::QuoteKey;
use investsim_core::providers::registry::{ALPHAVANTAGE_KEY, FINNHUB_KEY, FREECURRENCY_KEY};
use investsim_core::storage::document_store::DocumentStore;
use investsim_core::storage::file::FileDocumentStore;
use investsim_core::storage::memory::MemoryDocumentStore;
use investsim_core::MarketSimulator;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variables holding provider API keys, by provider id.
const API_KEY_VARS: [(&str, &str); 3] = [
    (FREECURRENCY_KEY, "FREECURRENCYAPI_KEY"),
    (FINNHUB_KEY, "FINNHUB_API_KEY"),
    (ALPHAVANTAGE_KEY, "ALPHAVANTAGE_API_KEY"),
];

#[derive(Parser)]
#[command(name = "investsim")]
#[command(about = "Simulate how market events move a multi-asset portfolio")]
struct Cli {
    /// Directory of the file-backed document store
    #[arg(short, long, global = true, default_value = "data/store")]
    store_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a JSON config and print its summary
    Run {
        /// Path to the simulation config
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Override the run id from the config
        #[arg(long)]
        run_id: Option<String>,

        /// Re-express the initial allocation in this currency before running
        #[arg(long, value_name = "CCY")]
        currency: Option<String>,

        /// Keep the run in memory instead of writing it to the store
        #[arg(long)]
        no_persist: bool,
    },
    /// List the market-event catalog
    Events,
    /// Show the conversion rate between two currencies
    Rate {
        #[arg(value_name = "BASE")]
        base: String,
        #[arg(value_name = "QUOTE")]
        quote: String,
    },
    /// Show the latest price of a stock
    Quote {
        #[arg(value_name = "SYMBOL")]
        symbol: String,
    },
    /// Re-fetch the quotes of every tracked company
    Refresh,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            run_id,
            currency,
            no_persist,
        } => {
            let store: Arc<dyn DocumentStore> = if no_persist {
                Arc::new(MemoryDocumentStore::new())
            } else {
                Arc::new(open_store(&cli.store_dir)?)
            };
            let simulator = MarketSimulator::new(store, api_keys_from_env());

            let mut config = SimulationConfig::load_from_file(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            if let Some(run_id) = run_id {
                config.run_id = Some(run_id);
            }
            if let Some(currency) = currency {
                config = simulator.localize(&config, &currency).await?;
            }

            let run = if no_persist {
                simulator.run(&config)?
            } else {
                simulator.run_and_persist(&config).await?
            };
            let summary = simulator.summarize(&run);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Events => {
            let simulator = MarketSimulator::new(Arc::new(MemoryDocumentStore::new()), HashMap::new());
            for (event, effects) in simulator.catalog().iter() {
                let factors: Vec<String> = effects
                    .iter()
                    .map(|(category, m)| format!("{}={}", category.key(), m.x))
                    .collect();
                println!("{:<20} {:<45} {}", event.name(), event.title(), factors.join(" "));
            }
        }
        Commands::Rate { base, quote } => {
            let simulator = open_simulator(&cli.store_dir)?;
            let key = QuoteKey::pair(&base, &quote);
            let rate = simulator.get_fresh_rate(&key).await?;
            println!("{} {rate}", key.symbol);
        }
        Commands::Quote { symbol } => {
            let simulator = open_simulator(&cli.store_dir)?;
            let key = QuoteKey::stock(symbol);
            let price = simulator.get_fresh_rate(&key).await?;
            println!("{} {price}", key.symbol);
        }
        Commands::Refresh => {
            let simulator = open_simulator(&cli.store_dir)?;
            let results = simulator.refresh_tracked_quotes().await;
            let mut failed = 0;
            for (key, result) in &results {
                match result {
                    Ok(price) => println!("{:<6} {price}", key.symbol),
                    Err(e) => {
                        failed += 1;
                        warn!("{}: {}", key.symbol, e);
                    }
                }
            }
            info!("Refreshed {} of {} quotes", results.len() - failed, results.len());
        }
    }

    Ok(())
}

fn open_store(dir: &Path) -> anyhow::Result<FileDocumentStore> {
    FileDocumentStore::open(dir).with_context(|| format!("opening store at {}", dir.display()))
}

fn open_simulator(dir: &Path) -> anyhow::Result<MarketSimulator> {
    let store = open_store(dir)?;
    Ok(MarketSimulator::new(Arc::new(store), api_keys_from_env()))
}

fn api_keys_from_env() -> HashMap<String, String> {
    API_KEY_VARS
        .iter()
        .filter_map(|(provider, var)| {
            std::env::var(var)
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(|key| (provider.to_string(), key))
        })
        .collect()
}

/// `RUST_LOG` when set, `info` otherwise.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
