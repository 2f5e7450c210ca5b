//! Aggregation of raw rule matches into the user-facing summary

use std::collections::HashMap;

use snip_core::{RuleMatch, Summary, SummaryHit};

use crate::estimator::saved_tokens;

/// Group raw hits by `(rule id, explain)` and sort descending by count.
/// The sort is stable, so equal counts keep first-encounter order.
pub fn summarize(original: &str, cleaned: &str, removed_chars: usize, hits: &[RuleMatch]) -> Summary {
    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    let mut order: Vec<(String, String)> = Vec::new();

    for hit in hits {
        let key = (hit.rule_id.clone(), hit.explain.clone());
        match counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                counts.insert(key.clone(), 1);
                order.push(key);
            }
        }
    }

    let mut grouped: Vec<SummaryHit> = order
        .into_iter()
        .map(|(id, explain)| {
            let count = counts[&(id.clone(), explain.clone())];
            SummaryHit { id, explain, count }
        })
        .collect();
    grouped.sort_by(|a, b| b.count.cmp(&a.count));

    Summary {
        removed_chars,
        saved_tokens: saved_tokens(original, cleaned),
        hits: grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str) -> RuleMatch {
        RuleMatch {
            rule_id: id.to_string(),
            matched: "x".to_string(),
            explain: format!("{id} explained"),
        }
    }

    #[test]
    fn test_counts_sum_to_raw_hits() {
        let hits = vec![hit("a"), hit("b"), hit("a"), hit("a"), hit("b")];
        let summary = summarize("original text here", "short", 13, &hits);
        assert_eq!(summary.total_hits(), hits.len());
    }

    #[test]
    fn test_sorted_descending_stable_ties() {
        let hits = vec![hit("a"), hit("b"), hit("c"), hit("b")];
        let summary = summarize("text", "text", 0, &hits);

        let ids: Vec<&str> = summary.hits.iter().map(|h| h.id.as_str()).collect();
        // "b" wins on count; "a" precedes "c" because it was seen first.
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_hits_empty_summary() {
        let summary = summarize("same", "same", 0, &[]);
        assert!(summary.is_empty());
        assert_eq!(summary.saved_tokens, 0);
    }
}
