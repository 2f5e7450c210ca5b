use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use snip_core::{Error, Result};

/// What a match is replaced with during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacePolicy {
    /// Replace the whole match with a single space.
    #[default]
    Blank,
    /// Keep only the first captured character (collapses repeated
    /// punctuation while leaving one instance in place).
    KeepFirstChar,
}

/// On-disk rule definition: an ordered entry in the rules resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub id: String,
    pub explain: String,
    pub pattern: String,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub policy: ReplacePolicy,
}

/// A compiled rule. Immutable once loaded; identity is `id`.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub explain: String,
    pub pattern: Regex,
    pub policy: ReplacePolicy,
}

impl Rule {
    /// Compile a spec into a matcher. Flags follow the usual regex
    /// shorthand: `i` (case-insensitive), `m` (multi-line), `s`
    /// (dot matches newline). Unknown flag characters are rejected.
    pub fn compile(spec: &RuleSpec) -> Result<Self> {
        let mut builder = RegexBuilder::new(&spec.pattern);
        for flag in spec.flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                // The browser-side 'g' and 'u' flags are implicit here.
                'g' | 'u' => &mut builder,
                other => {
                    return Err(Error::ResourceLoad(format!(
                        "rule '{}': unsupported flag '{}'",
                        spec.id, other
                    )));
                }
            };
        }
        let pattern = builder
            .build()
            .map_err(|e| Error::ResourceLoad(format!("rule '{}': {}", spec.id, e)))?;

        Ok(Self {
            id: spec.id.clone(),
            explain: spec.explain.clone(),
            pattern,
            policy: spec.policy,
        })
    }
}
