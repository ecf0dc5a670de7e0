use std::{fs, sync::Arc};
use tracing::{info, warn};
use tx_selector::{
    config::Config, pool::TransactionPool, processor::StateSimulator, BatchOrchestrator, Transaction,
};

/// Runs one selection round over the transactions listed in `pending_file`.
///
/// Usage: `tx-selector [config.toml]`, defaulting to `config/default.toml`.
/// The outcome is printed to stdout as JSON.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "config/default.toml".to_string());
    let config = Config::load(&path)?;
    info!("Selector starting with config: {:?}", config);

    let tx_pool = Arc::new(TransactionPool::new());
    match &config.pending_file {
        Some(file) => {
            let content = fs::read_to_string(file)?;
            let txs: Vec<Transaction> = serde_json::from_str(&content)?;
            for tx in txs {
                tx_pool.add(tx).await;
            }
            info!("Loaded {} pending transactions from {}", tx_pool.len().await, file);
        }
        None => warn!("No pending_file configured, the round will be empty"),
    }

    let mut simulator = StateSimulator::with_genesis(config.batch.max_cumulative_gas, &config.genesis);
    let orchestrator = BatchOrchestrator::new(tx_pool, &config.selector)?;

    let selection = orchestrator.run_round(&mut simulator, config.proposer).await?;
    println!("{}", serde_json::to_string_pretty(&selection)?);

    Ok(())
}
