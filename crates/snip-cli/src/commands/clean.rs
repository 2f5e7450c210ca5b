use std::path::PathBuf;

use anyhow::Result;
use snip_config::Config;

pub async fn handle(file: Option<PathBuf>, config: &Config) -> Result<()> {
    let text = super::read_input(file)?;
    let analyzer = super::build_analyzer(config).await;
    let analysis = analyzer.analyze(&text);
    println!("{}", analysis.cleaned);
    Ok(())
}
