//! Waste analyzer for snip
//!
//! Wraps the rule engine to produce a blocking decision: block when any
//! hit belongs to the blocking category set, or when total removed
//! characters meets the threshold. Either condition alone suffices.

pub mod estimator;
pub mod summary;

use std::collections::HashSet;

use async_trait::async_trait;
use snip_core::{Analysis, AnalysisBackend, Result, Summary, Verdict};
use snip_rules::RuleSet;
use snip_rules::builtin::BLOCKING_RULE_IDS;

pub use estimator::{estimate_tokens, saved_tokens};
pub use summary::summarize;

/// Thresholds and categories for the blocking decision.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Minimum removed characters that alone justifies blocking.
    pub block_threshold: usize,
    /// Rule ids whose presence alone justifies blocking.
    pub blocking_rules: HashSet<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            block_threshold: 5,
            blocking_rules: BLOCKING_RULE_IDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub struct Analyzer {
    rules: RuleSet,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(rules: RuleSet, config: AnalyzerConfig) -> Self {
        Self { rules, config }
    }

    /// Swap in a newly loaded rule set (e.g. when the external resource
    /// arrives after the fallback set was installed).
    pub fn set_rules(&mut self, rules: RuleSet) {
        self.rules = rules;
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn analyze(&self, text: &str) -> Analysis {
        let applied = self.rules.apply(text);
        let category_hit = applied
            .hits
            .iter()
            .any(|h| self.config.blocking_rules.contains(&h.rule_id));
        let should_block =
            category_hit || applied.removed_chars >= self.config.block_threshold;

        Analysis {
            cleaned: applied.cleaned,
            removed_chars: applied.removed_chars,
            hits: applied.hits,
            should_block,
        }
    }

    /// Analysis plus the aggregated summary, in one pass.
    pub fn analyze_with_summary(&self, text: &str) -> (Analysis, Summary) {
        let analysis = self.analyze(text);
        let summary = summarize(
            text,
            &analysis.cleaned,
            analysis.removed_chars,
            &analysis.hits,
        );
        (analysis, summary)
    }
}

/// The default backend for the submission gate: rule-based, in-process.
#[async_trait]
impl AnalysisBackend for Analyzer {
    async fn assess(&self, text: &str) -> Result<Verdict> {
        let (analysis, summary) = self.analyze_with_summary(text);
        Ok(Verdict {
            should_block: analysis.should_block,
            cleaned: Some(analysis.cleaned),
            summary: Some(summary),
        })
    }

    fn name(&self) -> &str {
        "local_rules"
    }
}
