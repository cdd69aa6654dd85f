use anyhow::{bail, Context, Result};
use std::env;
use std::path::Path;
use tracing::debug;

// Use library instead of local modules
use transaction_risk::{load_transactions, AppConfig, RiskAssessor};

const USAGE: &str = "Usage: transaction-risk assess <transactions.csv|transactions.json> [--explain]";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 2 && args[1] == "assess" {
        let explain = args[3..].iter().any(|arg| arg == "--explain");
        run_assess(Path::new(&args[2]), explain)?;
    } else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    Ok(())
}

fn run_assess(path: &Path, explain: bool) -> Result<()> {
    let config = AppConfig::load()?;
    config.logging.init()?;

    if !path.exists() {
        bail!("Transactions file not found: {:?}", path);
    }

    let transactions = load_transactions(path)?;
    debug!(count = transactions.len(), file = ?path, "Loaded transactions");

    let assessor = RiskAssessor::new(&config.thresholds, config.duplicates);

    let output = if explain {
        serde_json::to_string_pretty(&assessor.assess_detailed(&transactions))
    } else {
        serde_json::to_string_pretty(&assessor.assess(&transactions))
    }
    .context("Failed to serialize assessment")?;

    println!("{}", output);

    Ok(())
}
