pub mod analyze;
pub mod clean;
pub mod serve;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use snip_analyzer::{Analyzer, AnalyzerConfig};
use snip_config::Config;

/// Read the text to operate on: the named file, or stdin when omitted.
pub fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// Build an analyzer with the effective rule set for this config.
pub async fn build_analyzer(config: &Config) -> Analyzer {
    let rules = snip_server::load_rules(&config.rules).await;
    let analyzer_config = AnalyzerConfig {
        block_threshold: config.analyzer.block_threshold,
        blocking_rules: config.analyzer.blocking_rules.iter().cloned().collect(),
    };
    Analyzer::new(rules, analyzer_config)
}
