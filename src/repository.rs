// 🗂️ Transaction Repository - groups a batch by user
// Positions are stamped at ingestion and carried alongside each transaction

use crate::transaction::{PositionedTransaction, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// DUPLICATE POLICY
// ============================================================================

/// What to do with rows whose business fields repeat an earlier row of the same user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Every row is rated on its own
    #[default]
    KeepAll,

    /// Repeats are left out of the user's group and take the rating of the first occurrence
    Collapse,
}

// ============================================================================
// USER GROUP
// ============================================================================

/// Transactions of one user, always sorted by input position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserGroup {
    pub user_id: u64,
    members: Vec<PositionedTransaction>,
}

impl UserGroup {
    fn new(user_id: u64) -> Self {
        UserGroup {
            user_id,
            members: Vec::new(),
        }
    }

    /// Members in increasing position order
    pub fn transactions(&self) -> &[PositionedTransaction] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    // Grouping visits positions in increasing order, so pushing keeps the group sorted.
    fn push(&mut self, member: PositionedTransaction) {
        debug_assert!(self
            .members
            .last()
            .map_or(true, |last| last.position < member.position));
        self.members.push(member);
    }
}

// ============================================================================
// GROUPED BATCH
// ============================================================================

/// Result of grouping one batch
#[derive(Debug, Clone, Default)]
pub struct GroupedBatch {
    /// Keyed by user id. BTreeMap so iteration order is stable across runs.
    pub groups: BTreeMap<u64, UserGroup>,

    /// Collapsed duplicate position -> position of the first occurrence
    pub aliases: BTreeMap<usize, usize>,

    /// Number of rows in the submitted batch
    pub batch_len: usize,
}

impl GroupedBatch {
    pub fn user_count(&self) -> usize {
        self.groups.len()
    }

    pub fn group(&self, user_id: u64) -> Option<&UserGroup> {
        self.groups.get(&user_id)
    }
}

/// Map each user id to its transactions, tagging each with its 1-based input position.
///
/// No row is dropped because of its values. Under `DuplicatePolicy::Collapse`, a
/// repeated row is recorded in `aliases` instead of its user's group.
pub fn group_by_user(transactions: &[Transaction], policy: DuplicatePolicy) -> GroupedBatch {
    let mut groups: BTreeMap<u64, UserGroup> = BTreeMap::new();
    let mut aliases = BTreeMap::new();
    let mut first_seen: HashMap<&Transaction, usize> = HashMap::new();

    for (index, transaction) in transactions.iter().enumerate() {
        let position = index + 1;

        if policy == DuplicatePolicy::Collapse {
            if let Some(&original) = first_seen.get(transaction) {
                aliases.insert(position, original);
                continue;
            }
            first_seen.insert(transaction, position);
        }

        groups
            .entry(transaction.user_id)
            .or_insert_with(|| UserGroup::new(transaction.user_id))
            .push(PositionedTransaction {
                position,
                transaction: transaction.clone(),
            });
    }

    GroupedBatch {
        groups,
        aliases,
        batch_len: transactions.len(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
