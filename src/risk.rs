// ⚖️ Risk Levels - ordered severity scale and the monotonic merge
// low < medium < high; merging never lowers a rating

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Severity assigned to a transaction. Variant order defines the scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Label rendered for anything outside the known scale
pub const UNKNOWN_LABEL: &str = "unknown";

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Fixed output label
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Parse one of the fixed labels. Anything else, including "unknown", is None.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }

    /// Monotonic merge: the more severe of the two
    pub fn merge(self, other: RiskLevel) -> RiskLevel {
        self.max(other)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fold any number of rule outcomes into one severity, starting from Low.
///
/// Order of the inputs does not matter.
pub fn merge_all<I>(levels: I) -> RiskLevel
where
    I: IntoIterator<Item = RiskLevel>,
{
    levels.into_iter().fold(RiskLevel::Low, RiskLevel::merge)
}

// ============================================================================
// TESTS
// ============================================================================
