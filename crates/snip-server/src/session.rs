//! Page-scoped session
//!
//! Owns every component and the shared single-value slots. All state is
//! mutated from one place in response to commands; last write wins.

use std::time::Duration;

use snip_analyzer::{Analyzer, AnalyzerConfig};
use snip_config::Config;
use snip_core::{AnalysisBackend, Error, Result, Summary};
use snip_editor::{Command, Document, Tracker};
use snip_gate::{Choice, Gate, Outcome};
use snip_presenter::Presenter;
use snip_presenter::geometry::{Rect, Viewport};
use snip_remote::ScoringClient;
use snip_rules::RuleSet;
use tracing::{info, warn};

pub struct Session {
    document: Document,
    tracker: Tracker,
    analyzer: Analyzer,
    gate: Gate,
    presenter: Presenter,
    remote: Option<ScoringClient>,
    last_summary: Option<Summary>,
    target_rect: Option<Rect>,
    viewport: Viewport,
    config: Config,
}

impl Session {
    /// Create a session with an empty rule set. Call [`Session::init_rules`]
    /// afterwards; until then analysis degrades to whitespace
    /// normalization only.
    pub fn new(config: Config) -> Self {
        let analyzer_config = AnalyzerConfig {
            block_threshold: config.analyzer.block_threshold,
            blocking_rules: config.analyzer.blocking_rules.iter().cloned().collect(),
        };
        let remote = config
            .remote
            .endpoint
            .as_ref()
            .map(|e| ScoringClient::new(e.clone()).with_block_above(config.remote.block_above));

        let mut session = Self {
            document: Document::new(),
            tracker: Tracker::new(),
            analyzer: Analyzer::new(RuleSet::default(), analyzer_config),
            gate: Gate::new(),
            presenter: Presenter::new(),
            remote,
            last_summary: None,
            target_rect: None,
            viewport: Viewport {
                width: 1280.0,
                height: 800.0,
            },
            config,
        };
        session.tracker.scan(&session.document);
        session
    }

    /// Load the configured rules resource, falling back to the built-in
    /// set if nothing usable arrives within the fallback window, then
    /// re-run analysis on the current target.
    pub async fn init_rules(&mut self) {
        let rules = load_rules(&self.config.rules).await;
        self.analyzer.set_rules(rules);
        self.refresh_current();
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.last_summary.as_ref()
    }

    /// Host-reported geometry for badge anchoring; recomputed on
    /// scroll/resize.
    pub fn relayout(&mut self, target_rect: Option<Rect>, viewport: Viewport) {
        self.target_rect = target_rect;
        self.viewport = viewport;
        self.update_badge();
    }

    /// Route one command through the tracker and, for submission
    /// attempts, the gate. Returns the gate outcome when one was reached.
    pub async fn dispatch(&mut self, command: Command) -> Option<Outcome> {
        match command {
            Command::SubmitAttempt(press) => {
                use snip_gate::{GateState, KeyDisposition};
                let disposition = self.gate.on_key(&self.document, &self.tracker, &press);
                if disposition == KeyDisposition::Suppress
                    && self.gate.state() == GateState::Intercepted
                {
                    let backend: &dyn AnalysisBackend = match &self.remote {
                        Some(client) => client,
                        None => &self.analyzer,
                    };
                    let outcome = self
                        .gate
                        .resolve(&mut self.document, &self.tracker, backend)
                        .await;
                    if outcome == Outcome::Prompt
                        && let Some(verdict) = self.gate.pending_verdict()
                    {
                        self.presenter.show_modal(verdict);
                    }
                    return Some(outcome);
                }
                None
            }
            Command::Dismiss => {
                self.dismiss_modal();
                None
            }
            other => {
                self.tracker.handle(&self.document, &other);
                self.refresh_current();
                None
            }
        }
    }

    /// Apply a modal choice and refresh.
    pub fn choose(&mut self, choice: Choice) {
        self.gate.choose(&mut self.document, choice);
        self.presenter.hide_modal();
        self.refresh_current();
    }

    /// Escape from the modal.
    pub fn dismiss_modal(&mut self) {
        self.gate.dismiss();
        self.presenter.hide_modal();
    }

    /// Apply the rule engine to the current target in place and update
    /// the summary. This also backs the clean-current keyboard shortcut.
    pub fn clean_current(&mut self) -> Result<Summary> {
        let target = self
            .tracker
            .current(&self.document)
            .ok_or(Error::NoActiveTarget)?;
        let text = target.read(&self.document).ok_or(Error::NoActiveTarget)?;

        let (analysis, summary) = self.analyzer.analyze_with_summary(&text);
        target.write(&mut self.document, &analysis.cleaned);
        self.last_summary = Some(summary.clone());
        self.update_badge();
        Ok(summary)
    }

    /// Re-analyze the current target and refresh the summary slot and
    /// badge. Safe no-op when there is no valid target.
    pub fn refresh_current(&mut self) {
        if let Some(target) = self.tracker.current(&self.document)
            && let Some(text) = target.read(&self.document)
        {
            let (_, summary) = self.analyzer.analyze_with_summary(&text);
            self.last_summary = Some(summary);
        }
        self.update_badge();
    }

    fn update_badge(&mut self) {
        let rect = self
            .tracker
            .current(&self.document)
            .and_then(|_| self.target_rect);
        self.presenter
            .update_badge(self.last_summary.as_ref(), rect, self.viewport);
    }
}

/// Resolve the effective rule set: the configured resource when one
/// loads in time and is non-empty, the built-in set otherwise.
pub async fn load_rules(config: &snip_config::RulesConfig) -> RuleSet {
    let Some(source) = config.source.clone() else {
        return RuleSet::builtin();
    };
    let window = Duration::from_millis(config.fallback_delay_ms);
    match tokio::time::timeout(window, fetch_rules(&source)).await {
        Ok(Ok(rules)) if !rules.is_empty() => {
            info!(source, count = rules.len(), "loaded external rules");
            rules
        }
        Ok(Ok(_)) => {
            warn!(source, "rules resource was empty, using built-in set");
            RuleSet::builtin()
        }
        Ok(Err(e)) => {
            warn!(source, error = %e, "rules load failed, using built-in set");
            RuleSet::builtin()
        }
        Err(_) => {
            warn!(source, "rules load timed out, using built-in set");
            RuleSet::builtin()
        }
    }
}

/// Fetch a rules resource from a file path or an http(s) URL and compile
/// it with per-rule isolation.
async fn fetch_rules(source: &str) -> Result<RuleSet> {
    let body = if source.starts_with("http://") || source.starts_with("https://") {
        reqwest::get(source)
            .await
            .map_err(|e| Error::ResourceLoad(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::ResourceLoad(e.to_string()))?
            .text()
            .await
            .map_err(|e| Error::ResourceLoad(e.to_string()))?
    } else {
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| Error::ResourceLoad(format!("{source}: {e}")))?
    };
    RuleSet::from_json(&body)
}
