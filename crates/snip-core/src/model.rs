use serde::{Deserialize, Serialize};

/// One occurrence of a rule's pattern found in a text.
///
/// Produced and consumed within a single analysis pass; aggregation into a
/// [`Summary`] happens afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub rule_id: String,
    pub matched: String,
    pub explain: String,
}

/// Result of one analysis pass over a text. Derived fresh on every call,
/// never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub cleaned: String,
    pub removed_chars: usize,
    pub hits: Vec<RuleMatch>,
    pub should_block: bool,
}

/// Aggregated, user-facing statistics about removable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub removed_chars: usize,
    pub saved_tokens: usize,
    /// Grouped by `(id, explain)`, sorted descending by count.
    /// Ties keep first-encounter order.
    pub hits: Vec<SummaryHit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryHit {
    pub id: String,
    pub explain: String,
    pub count: usize,
}

impl Summary {
    /// Total number of raw matches this summary was built from.
    pub fn total_hits(&self) -> usize {
        self.hits.iter().map(|h| h.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.removed_chars == 0 && self.hits.is_empty()
    }
}

/// The unified blocking decision every analysis backend resolves to.
///
/// Local rule analysis and remote similarity scoring compute their
/// decisions differently; both adapt into this one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub should_block: bool,
    /// Replacement text offered to the user when blocking.
    pub cleaned: Option<String>,
    /// Present for rule-based verdicts; remote scoring has no breakdown.
    pub summary: Option<Summary>,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            should_block: false,
            cleaned: None,
            summary: None,
        }
    }
}
