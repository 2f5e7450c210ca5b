use once_cell::sync::Lazy;
use regex::Regex;
use snip_core::RuleMatch;
use tracing::warn;

use crate::rule::{ReplacePolicy, Rule, RuleSpec};

/// Output of one engine pass: cleaned text, characters removed (rule
/// replacements plus whitespace normalization, accumulated separately),
/// and the raw matches in rule/match order.
#[derive(Debug, Clone)]
pub struct Applied {
    pub cleaned: String,
    pub removed_chars: usize,
    pub hits: Vec<RuleMatch>,
}

/// An ordered set of compiled rules. Application order is load order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

static HORIZONTAL_RUNS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());
static SPACE_BEFORE_NEWLINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());

/// Whitespace normalization applied after all rules have run: collapse
/// runs of 2+ horizontal whitespace to one space, drop whitespace
/// hanging before a newline, then trim both ends.
pub fn normalize(text: &str) -> String {
    let collapsed = HORIZONTAL_RUNS_RE.replace_all(text, " ");
    let collapsed = SPACE_BEFORE_NEWLINE_RE.replace_all(&collapsed, "\n");
    collapsed.trim().to_string()
}

impl RuleSet {
    /// Compile specs in order. A spec that fails to compile is skipped
    /// and logged; it never invalidates the rest of the set.
    pub fn from_specs(specs: &[RuleSpec]) -> Self {
        let rules = specs
            .iter()
            .filter_map(|spec| match Rule::compile(spec) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    warn!("skipping rule '{}': {}", spec.id, e);
                    None
                }
            })
            .collect();
        Self { rules }
    }

    /// Decode a rules resource (ordered JSON array of specs) and compile
    /// it with per-rule isolation. A document-level decode failure is a
    /// load error; the engine then degrades to the zero-rule state.
    pub fn from_json(json: &str) -> snip_core::Result<Self> {
        let specs: Vec<RuleSpec> = serde_json::from_str(json)
            .map_err(|e| snip_core::Error::ResourceLoad(e.to_string()))?;
        Ok(Self::from_specs(&specs))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Apply all rules in load order, each scanning the text as rewritten
    /// by earlier rules, then normalize whitespace. The zero-rule set
    /// degrades to a pure normalization pass.
    pub fn apply(&self, text: &str) -> Applied {
        let mut current = text.to_string();
        let mut removed_chars = 0usize;
        let mut hits = Vec::new();

        for rule in &self.rules {
            let mut rewritten = String::with_capacity(current.len());
            let mut last = 0;
            for caps in rule.pattern.captures_iter(&current) {
                let m = caps.get(0).expect("group 0 always present");
                rewritten.push_str(&current[last..m.start()]);

                let replacement = match rule.policy {
                    ReplacePolicy::Blank => " ".to_string(),
                    ReplacePolicy::KeepFirstChar => {
                        let captured = caps.get(1).map_or(m.as_str(), |g| g.as_str());
                        captured.chars().take(1).collect()
                    }
                };
                removed_chars += m
                    .as_str()
                    .chars()
                    .count()
                    .saturating_sub(replacement.chars().count());
                hits.push(RuleMatch {
                    rule_id: rule.id.clone(),
                    matched: m.as_str().to_string(),
                    explain: rule.explain.clone(),
                });
                rewritten.push_str(&replacement);
                last = m.end();
            }
            rewritten.push_str(&current[last..]);
            current = rewritten;
        }

        let before_normalize = current.chars().count();
        let cleaned = normalize(&current);
        removed_chars += before_normalize.saturating_sub(cleaned.chars().count());

        Applied {
            cleaned,
            removed_chars,
            hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(entries: &[(&str, &str, ReplacePolicy)]) -> RuleSet {
        let specs: Vec<RuleSpec> = entries
            .iter()
            .map(|(id, pattern, policy)| RuleSpec {
                id: id.to_string(),
                explain: format!("{id} explained"),
                pattern: pattern.to_string(),
                flags: "i".to_string(),
                policy: *policy,
            })
            .collect();
        RuleSet::from_specs(&specs)
    }

    #[test]
    fn test_empty_set_is_pure_normalization() {
        let empty = RuleSet::default();
        let text = "  hello   world \nnext  ";
        let applied = empty.apply(text);

        assert_eq!(applied.cleaned, normalize(text));
        assert_eq!(
            applied.removed_chars,
            text.chars().count() - applied.cleaned.chars().count()
        );
        assert!(applied.hits.is_empty());
    }

    #[test]
    fn test_blank_policy_replaces_with_single_space() {
        let rules = set(&[("politeness", r"\bplease\b", ReplacePolicy::Blank)]);
        let applied = rules.apply("please fix this");

        assert_eq!(applied.cleaned, "fix this");
        assert_eq!(applied.hits.len(), 1);
        assert_eq!(applied.hits[0].rule_id, "politeness");
        assert_eq!(applied.hits[0].matched, "please");
    }

    #[test]
    fn test_keep_first_char_collapses_punctuation() {
        let rules = set(&[("excess-punct", r"([!?])[!?]+", ReplacePolicy::KeepFirstChar)]);
        let applied = rules.apply("really???");

        assert_eq!(applied.cleaned, "really?");
        assert_eq!(applied.removed_chars, 2);
    }

    #[test]
    fn test_rules_compose_sequentially() {
        // The second rule only matches after the first has rewritten the text.
        let rules = set(&[
            ("first", r"\bvery\b", ReplacePolicy::Blank),
            ("second", r"good good", ReplacePolicy::Blank),
        ]);
        // "good very good" -> "good  good" -> normalization would merge,
        // but rule two scans pre-normalization text with the double space.
        let applied = rules.apply("good very good");
        assert_eq!(applied.hits.len(), 1);
        assert_eq!(applied.hits[0].rule_id, "first");
        assert_eq!(applied.cleaned, "good good");
    }

    #[test]
    fn test_removed_count_accumulates_both_phases() {
        let rules = set(&[("politeness", r"\bplease\b", ReplacePolicy::Blank)]);
        let original = "please   help";
        let applied = rules.apply(original);

        assert_eq!(applied.cleaned, "help");
        assert_eq!(
            applied.removed_chars,
            original.chars().count() - applied.cleaned.chars().count()
        );
    }

    #[test]
    fn test_one_pass_reaches_fixed_point() {
        let rules = set(&[
            ("politeness", r"\b(please|thanks)\b", ReplacePolicy::Blank),
            ("excess-punct", r"([!?])[!?]+", ReplacePolicy::KeepFirstChar),
        ]);
        let first = rules.apply("please fix!! thanks");
        let second = rules.apply(&first.cleaned);

        assert_eq!(second.cleaned, first.cleaned);
        assert!(second.hits.is_empty());
        assert_eq!(second.removed_chars, 0);
    }

    #[test]
    fn test_malformed_rule_is_skipped_not_fatal() {
        let json = r#"[
            {"id": "broken", "explain": "bad", "pattern": "(unclosed", "flags": ""},
            {"id": "ok", "explain": "fine", "pattern": "\\bfiller\\b", "flags": "i"}
        ]"#;
        let rules = RuleSet::from_json(json).unwrap();
        assert_eq!(rules.len(), 1);

        let applied = rules.apply("some FILLER here");
        assert_eq!(applied.hits.len(), 1);
        assert_eq!(applied.hits[0].rule_id, "ok");
    }

    #[test]
    fn test_malformed_document_is_load_error() {
        assert!(matches!(
            RuleSet::from_json("not json"),
            Err(snip_core::Error::ResourceLoad(_))
        ));
    }

    #[test]
    fn test_normalize_keeps_newlines() {
        assert_eq!(normalize("line one   \nline  two"), "line one\nline two");
    }
}
