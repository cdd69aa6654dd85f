// 🏷️ Risk Rules - three independent rules over a user's group
// Each rule returns one severity per member; the engine folds them with max

use crate::error::ConfigError;
use crate::repository::UserGroup;
use crate::risk::{merge_all, RiskLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Rule boundaries. Amounts are in minor currency units and compared with `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Single amount above this is medium
    pub single_medium: i64,

    /// Single amount above this is high
    pub single_high: i64,

    /// Running total above this is medium
    pub total_medium: i64,

    /// Running total above this is high
    pub total_high: i64,

    /// Distinct cards at or above this count are medium
    pub cards_medium: usize,

    /// Distinct cards at or above this count are high
    pub cards_high: usize,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            single_medium: 500_000,
            single_high: 1_000_000,
            total_medium: 1_000_000,
            total_high: 2_000_000,
            cards_medium: 2,
            cards_high: 3,
        }
    }
}

impl RiskThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.single_medium >= self.single_high {
            return Err(ConfigError::InvertedThresholds {
                name: "single",
                medium: self.single_medium,
                high: self.single_high,
            });
        }
        if self.total_medium >= self.total_high {
            return Err(ConfigError::InvertedThresholds {
                name: "total",
                medium: self.total_medium,
                high: self.total_high,
            });
        }
        if self.cards_medium == 0 {
            return Err(ConfigError::CardThresholdTooLow(self.cards_medium));
        }
        if self.cards_medium >= self.cards_high {
            return Err(ConfigError::InvertedThresholds {
                name: "cards",
                medium: self.cards_medium as i64,
                high: self.cards_high as i64,
            });
        }
        Ok(())
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// A rule scans one user's group and rates every member.
///
/// `evaluate` must return exactly `group.len()` levels, in the group's position order.
/// `RuleEngine::evaluate` panics if a rule returns any other count.
pub trait RiskRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, group: &UserGroup) -> Vec<RiskLevel>;
}

/// Rates each transaction by its own amount
#[derive(Debug, Clone)]
pub struct SingleAmountRule {
    pub medium_above: i64,
    pub high_above: i64,
}

impl SingleAmountRule {
    pub fn level_for(&self, amount: i64) -> RiskLevel {
        if amount > self.high_above {
            RiskLevel::High
        } else if amount > self.medium_above {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl RiskRule for SingleAmountRule {
    fn name(&self) -> &'static str {
        "single_amount"
    }

    fn evaluate(&self, group: &UserGroup) -> Vec<RiskLevel> {
        group
            .transactions()
            .iter()
            .map(|member| self.level_for(member.transaction.amount_us_cents))
            .collect()
    }
}

/// Rates each transaction by the user's running total up to and including it.
///
/// Negative amounts lower the running total.
#[derive(Debug, Clone)]
pub struct CumulativeAmountRule {
    pub medium_above: i64,
    pub high_above: i64,
}

impl CumulativeAmountRule {
    pub fn level_for(&self, running_total: i64) -> RiskLevel {
        if running_total > self.high_above {
            RiskLevel::High
        } else if running_total > self.medium_above {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl RiskRule for CumulativeAmountRule {
    fn name(&self) -> &'static str {
        "cumulative_amount"
    }

    fn evaluate(&self, group: &UserGroup) -> Vec<RiskLevel> {
        let mut running_total: i64 = 0;

        group
            .transactions()
            .iter()
            .map(|member| {
                running_total = running_total.saturating_add(member.transaction.amount_us_cents);
                self.level_for(running_total)
            })
            .collect()
    }
}

/// Rates each transaction by how many distinct cards the user has used so far
#[derive(Debug, Clone)]
pub struct DistinctCardRule {
    pub medium_at: usize,
    pub high_at: usize,
}

impl DistinctCardRule {
    pub fn level_for(&self, distinct_cards: usize) -> RiskLevel {
        if distinct_cards >= self.high_at {
            RiskLevel::High
        } else if distinct_cards >= self.medium_at {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl RiskRule for DistinctCardRule {
    fn name(&self) -> &'static str {
        "distinct_cards"
    }

    fn evaluate(&self, group: &UserGroup) -> Vec<RiskLevel> {
        let mut seen_cards = HashSet::new();

        group
            .transactions()
            .iter()
            .map(|member| {
                seen_cards.insert(member.transaction.card_id);
                self.level_for(seen_cards.len())
            })
            .collect()
    }
}

// ============================================================================
// RULE OUTCOME
// ============================================================================

/// Levels one rule assigned to a group, aligned with the group's members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: &'static str,
    pub levels: Vec<RiskLevel>,
}

/// Fold several outcomes over the same group into one level per member
pub fn merge_outcomes(outcomes: &[RuleOutcome], group_len: usize) -> Vec<RiskLevel> {
    (0..group_len)
        .map(|index| merge_all(outcomes.iter().map(|outcome| outcome.levels[index])))
        .collect()
}

// ============================================================================
// RULE ENGINE
// ============================================================================

pub struct RuleEngine {
    rules: Vec<Box<dyn RiskRule>>,
}

impl RuleEngine {
    /// Create a new empty rule engine
    pub fn new() -> Self {
        RuleEngine { rules: Vec::new() }
    }

    /// The three standard rules built from the given boundaries
    pub fn from_thresholds(thresholds: &RiskThresholds) -> Self {
        let mut engine = RuleEngine::new();
        engine.add_rule(SingleAmountRule {
            medium_above: thresholds.single_medium,
            high_above: thresholds.single_high,
        });
        engine.add_rule(CumulativeAmountRule {
            medium_above: thresholds.total_medium,
            high_above: thresholds.total_high,
        });
        engine.add_rule(DistinctCardRule {
            medium_at: thresholds.cards_medium,
            high_at: thresholds.cards_high,
        });
        engine
    }

    /// Add a single rule
    pub fn add_rule<R: RiskRule + 'static>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
    }

    /// Run every rule over one group
    pub fn evaluate(&self, group: &UserGroup) -> Vec<RuleOutcome> {
        self.rules
            .iter()
            .map(|rule| {
                let levels = rule.evaluate(group);
                assert_eq!(levels.len(), group.len(), "rule {} misaligned", rule.name());
                RuleOutcome {
                    rule: rule.name(),
                    levels,
                }
            })
            .collect()
    }

    /// Names of the loaded rules, in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::from_thresholds(&RiskThresholds::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
