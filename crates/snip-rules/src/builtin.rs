//! Built-in fallback rule set
//!
//! Installed by the session when no external rules resource loads within
//! the fallback window, so analysis always has something sane to run with.

use crate::rule::{ReplacePolicy, RuleSpec};
use crate::set::RuleSet;

/// Rule ids whose presence alone is sufficient to withhold submission.
pub const BLOCKING_RULE_IDS: &[&str] = &["politeness", "greeting"];

fn spec(id: &str, explain: &str, pattern: &str, policy: ReplacePolicy) -> RuleSpec {
    RuleSpec {
        id: id.to_string(),
        explain: explain.to_string(),
        pattern: pattern.to_string(),
        flags: "i".to_string(),
        policy,
    }
}

impl RuleSet {
    /// Minimal sanity rules covering the common filler categories.
    pub fn builtin() -> Self {
        let specs = vec![
            spec(
                "greeting",
                "Greetings add no information for the model",
                r"\b(hello there|hi there|hey there|dear assistant)\b",
                ReplacePolicy::Blank,
            ),
            spec(
                "politeness",
                "Politeness tokens are ignored by the model",
                r"\b(please|kindly|thanks in advance|thanks|thank you)\b",
                ReplacePolicy::Blank,
            ),
            spec(
                "filler-phrase",
                "Filler framing burns tokens without adding intent",
                r"\b(i was wondering if( you could)?|it would be great if( you could)?|just wanted to|if (at all )?possible|would you mind)\b",
                ReplacePolicy::Blank,
            ),
            spec(
                "hedging",
                "Hedging softens the request without changing it",
                r"\b(perhaps|maybe|possibly|sort of|kind of|i think that|i guess)\b",
                ReplacePolicy::Blank,
            ),
            spec(
                "excess-punct",
                "Repeated punctuation collapses to one",
                r"([!?.,])[!?.,]+",
                ReplacePolicy::KeepFirstChar,
            ),
        ];
        Self::from_specs(&specs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_compiles_fully() {
        let rules = RuleSet::builtin();
        assert_eq!(rules.len(), 5);
    }

    #[test]
    fn test_builtin_cleans_the_canonical_example() {
        let rules = RuleSet::builtin();
        let applied = rules.apply("hello there, please clean this up, thanks!");

        assert_eq!(applied.cleaned, ", clean this up, !");
        assert!(applied.hits.iter().any(|h| h.rule_id == "greeting"));
        assert!(applied.hits.iter().any(|h| h.rule_id == "politeness"));
    }

    #[test]
    fn test_blocking_ids_exist_in_builtin() {
        let rules = RuleSet::builtin();
        let applied = rules.apply("please and hello there");
        for id in BLOCKING_RULE_IDS {
            assert!(
                applied.hits.iter().any(|h| &h.rule_id == id),
                "expected a hit for blocking rule '{id}'"
            );
        }
    }
}
