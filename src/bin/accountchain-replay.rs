#![forbid(unsafe_code)]
//! Replay a batch of transactions over a genesis state and print the result

use accountchain::config::load_config;
use accountchain::hashing::Sha256Hasher;
use accountchain::process::{BlockMode, BlockProcessor, TxProcessor};
use accountchain::state::{Account, InMemoryAccounts};
use accountchain::transaction::Transaction;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (defaults apply when absent)
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// JSON array of genesis accounts
    #[arg(long)]
    genesis: PathBuf,
    /// JSON array of transactions, applied in order as one block
    #[arg(long)]
    transactions: PathBuf,
    /// Round index passed to the processor
    #[arg(long, default_value_t = 0)]
    round: i32,
    /// Drop invalid transactions instead of rejecting the whole block
    #[arg(long)]
    skip_invalid: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let genesis: Vec<Account> = serde_json::from_str(&std::fs::read_to_string(&cli.genesis)?)
        .map_err(|e| format!("Failed to parse genesis {}: {}", cli.genesis.display(), e))?;
    let transactions: Vec<Transaction> =
        serde_json::from_str(&std::fs::read_to_string(&cli.transactions)?).map_err(|e| {
            format!(
                "Failed to parse transactions {}: {}",
                cli.transactions.display(),
                e
            )
        })?;

    let converter = config.address_converter();
    let store = Arc::new(InMemoryAccounts::new());
    for account in genesis {
        store.seed_checked(account, converter.as_ref())?;
    }
    info!(accounts = store.len(), transactions = transactions.len(), "loaded replay input");

    let hasher = Arc::new(Sha256Hasher);
    let marshalizer = config.marshalizer();
    let processor = TxProcessor::builder()
        .accounts(store.clone())
        .hasher(hasher.clone())
        .address_converter(converter)
        .marshalizer(marshalizer.clone())
        .registration_policy(config.registration_policy()?)
        .build()?;

    let mode = if cli.skip_invalid {
        BlockMode::SkipInvalid
    } else {
        BlockMode::Strict
    };
    let report = BlockProcessor::new(Arc::new(processor), mode).apply(&transactions, cli.round)?;

    let rejected: Vec<serde_json::Value> = report
        .rejected
        .iter()
        .map(|r| serde_json::json!({ "index": r.index, "error": r.error.to_string() }))
        .collect();
    let state_root = store.root_hash(hasher.as_ref(), marshalizer.as_ref())?;

    let output = serde_json::json!({
        "applied": report.applied,
        "rejected": rejected,
        "accounts": store.accounts(),
        "state_root": hex::encode(state_root),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
