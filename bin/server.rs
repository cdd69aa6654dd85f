// Transaction Risk Assessment - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use tracing::info;
use transaction_risk::api::{create_router, AppState};
use transaction_risk::{AppConfig, RiskAssessor};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    config.logging.init()?;

    info!(
        single = ?(config.thresholds.single_medium, config.thresholds.single_high),
        total = ?(config.thresholds.total_medium, config.thresholds.total_high),
        cards = ?(config.thresholds.cards_medium, config.thresholds.cards_high),
        duplicates = ?config.duplicates,
        "Risk thresholds loaded"
    );

    let state = AppState::new(RiskAssessor::new(&config.thresholds, config.duplicates));
    let app = create_router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("POST /check_transactions to assess a batch");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
