// 🧮 Risk Assessment - group, rate, merge, reassemble
// Output order is always input order, never grouping order

use crate::repository::{group_by_user, DuplicatePolicy, GroupedBatch};
use crate::risk::RiskLevel;
use crate::rules::{merge_outcomes, RiskThresholds, RuleEngine};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

// ============================================================================
// RESULTS
// ============================================================================

/// Response payload: one label per input transaction, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRateResults {
    pub risk_ratings: Vec<String>,
}

impl RiskRateResults {
    pub fn len(&self) -> usize {
        self.risk_ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.risk_ratings.is_empty()
    }
}

/// Per-transaction breakdown of how the final level was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAssessment {
    pub position: usize,
    pub id: u64,
    pub user_id: u64,

    /// Level each rule assigned, keyed by rule name
    pub rule_levels: BTreeMap<String, RiskLevel>,

    /// Merged level
    pub risk: RiskLevel,

    /// Set when this row was collapsed into an earlier identical row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<usize>,
}

// ============================================================================
// RISK ASSESSOR
// ============================================================================

/// Stateless between calls; safe to share across threads.
pub struct RiskAssessor {
    engine: RuleEngine,
    duplicates: DuplicatePolicy,
}

impl RiskAssessor {
    pub fn new(thresholds: &RiskThresholds, duplicates: DuplicatePolicy) -> Self {
        RiskAssessor {
            engine: RuleEngine::from_thresholds(thresholds),
            duplicates,
        }
    }

    pub fn with_engine(engine: RuleEngine, duplicates: DuplicatePolicy) -> Self {
        RiskAssessor { engine, duplicates }
    }

    /// Rate a batch and render the labels
    pub fn assess(&self, transactions: &[Transaction]) -> RiskRateResults {
        render(&self.assess_detailed(transactions))
    }

    /// Rate a batch, keeping the per-rule breakdown. Sorted by input position.
    pub fn assess_detailed(&self, transactions: &[Transaction]) -> Vec<TransactionAssessment> {
        let batch = group_by_user(transactions, self.duplicates);
        debug!(
            batch_size = batch.batch_len,
            users = batch.user_count(),
            collapsed = batch.aliases.len(),
            "Assessing batch"
        );

        let assessed = self.evaluate_groups(&batch);
        let assessed = resolve_aliases(assessed, &batch, transactions);
        assemble(assessed, batch.batch_len)
    }

    fn evaluate_groups(&self, batch: &GroupedBatch) -> Vec<TransactionAssessment> {
        let mut assessed = Vec::with_capacity(batch.batch_len);

        for group in batch.groups.values() {
            let outcomes = self.engine.evaluate(group);
            let merged = merge_outcomes(&outcomes, group.len());

            for (index, member) in group.transactions().iter().enumerate() {
                let rule_levels = outcomes
                    .iter()
                    .map(|outcome| (outcome.rule.to_string(), outcome.levels[index]))
                    .collect();

                assessed.push(TransactionAssessment {
                    position: member.position,
                    id: member.transaction.id,
                    user_id: member.transaction.user_id,
                    rule_levels,
                    risk: merged[index],
                    alias_of: None,
                });
            }
        }

        assessed
    }
}

impl Default for RiskAssessor {
    fn default() -> Self {
        RiskAssessor::new(&RiskThresholds::default(), DuplicatePolicy::default())
    }
}

/// Rate a batch with the default thresholds and duplicate policy
pub fn assess_transactions(transactions: &[Transaction]) -> RiskRateResults {
    RiskAssessor::default().assess(transactions)
}

// ============================================================================
// RESULT ASSEMBLY
// ============================================================================

// Collapsed rows copy the assessment of the row they repeat.
fn resolve_aliases(
    mut assessed: Vec<TransactionAssessment>,
    batch: &GroupedBatch,
    transactions: &[Transaction],
) -> Vec<TransactionAssessment> {
    if batch.aliases.is_empty() {
        return assessed;
    }

    let by_position: HashMap<usize, usize> = assessed
        .iter()
        .enumerate()
        .map(|(index, item)| (item.position, index))
        .collect();

    let mut copies = Vec::with_capacity(batch.aliases.len());
    for (&position, &original) in &batch.aliases {
        let Some(&index) = by_position.get(&original) else {
            continue;
        };
        let source = &assessed[index];
        let transaction = &transactions[position - 1];

        copies.push(TransactionAssessment {
            position,
            id: transaction.id,
            user_id: transaction.user_id,
            rule_levels: source.rule_levels.clone(),
            risk: source.risk,
            alias_of: Some(original),
        });
    }

    assessed.extend(copies);
    assessed
}

/// Flatten every group back into input order
fn assemble(mut assessed: Vec<TransactionAssessment>, batch_len: usize) -> Vec<TransactionAssessment> {
    assessed.sort_by_key(|item| item.position);

    debug_assert_eq!(assessed.len(), batch_len);
    debug_assert!(assessed
        .iter()
        .enumerate()
        .all(|(index, item)| item.position == index + 1));

    assessed
}

/// Render final levels as labels, keeping order
pub fn render(assessments: &[TransactionAssessment]) -> RiskRateResults {
    RiskRateResults {
        risk_ratings: assessments
            .iter()
            .map(|item| item.risk.label().to_string())
            .collect(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
