use std::path::PathBuf;

use anyhow::Result;
use snip_config::Config;

pub async fn handle(file: Option<PathBuf>, json: bool, config: &Config) -> Result<()> {
    let text = super::read_input(file)?;
    let analyzer = super::build_analyzer(config).await;
    let (analysis, summary) = analyzer.analyze_with_summary(&text);

    if json {
        let out = serde_json::json!({
            "shouldBlock": analysis.should_block,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if summary.is_empty() {
        println!("Nothing to remove.");
        return Ok(());
    }

    println!(
        "Removed {} chars (~{} tokens saved)",
        summary.removed_chars, summary.saved_tokens
    );
    for hit in &summary.hits {
        println!("  {:>3}x {} - {}", hit.count, hit.id, hit.explain);
    }
    if analysis.should_block {
        println!("Submission would be withheld for review.");
    }
    Ok(())
}
