// Transaction Risk Assessment - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod risk;
pub mod transaction;
pub mod repository;
pub mod rules;
pub mod assessment;
pub mod config;
pub mod error;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use risk::{merge_all, RiskLevel, UNKNOWN_LABEL};
pub use transaction::{
    Transaction, PositionedTransaction, TransactionsInput,
    load_csv, load_json, load_transactions,
};
pub use repository::{group_by_user, DuplicatePolicy, GroupedBatch, UserGroup};
pub use rules::{
    RiskRule, RuleEngine, RuleOutcome, RiskThresholds,
    SingleAmountRule, CumulativeAmountRule, DistinctCardRule,
    merge_outcomes,
};
pub use assessment::{
    RiskAssessor, RiskRateResults, TransactionAssessment,
    assess_transactions, render,
};
pub use config::{AppConfig, LoggingConfig, ServerConfig};
pub use error::ConfigError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
