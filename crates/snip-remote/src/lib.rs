//! Remote similarity scoring client
//!
//! Posts the target text to a configured endpoint and adapts the
//! similarity decision into the unified verdict shape. The request body
//! is always `{"text": ...}`; the response must carry `maxSimilarity`
//! and may offer a `cleaned` replacement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use snip_core::{AnalysisBackend, Error, Result, Verdict};
use tracing::debug;

/// Similarity above which submission is withheld.
pub const DEFAULT_BLOCK_ABOVE: f64 = 0.8;

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResponse {
    #[serde(rename = "maxSimilarity")]
    pub max_similarity: f64,
    #[serde(default)]
    pub cleaned: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScoringClient {
    http: reqwest::Client,
    endpoint: String,
    block_above: f64,
}

impl ScoringClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            block_above: DEFAULT_BLOCK_ABOVE,
        }
    }

    pub fn with_block_above(mut self, threshold: f64) -> Self {
        self.block_above = threshold;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Score a text against the remote endpoint. Non-2xx responses and
    /// malformed bodies surface as [`Error::RemoteAnalysis`].
    pub async fn score(&self, text: &str) -> Result<ScoreResponse> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&ScoreRequest { text })
            .send()
            .await
            .map_err(|e| Error::RemoteAnalysis {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                body: Some(e.to_string()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            return Err(Error::RemoteAnalysis {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ScoreResponse =
            response.json().await.map_err(|e| Error::RemoteAnalysis {
                status: status.as_u16(),
                body: Some(format!("malformed response: {e}")),
            })?;
        debug!(
            similarity = parsed.max_similarity,
            "remote scoring completed"
        );
        Ok(parsed)
    }
}

#[async_trait]
impl AnalysisBackend for ScoringClient {
    async fn assess(&self, text: &str) -> Result<Verdict> {
        let scored = self.score(text).await?;
        Ok(Verdict {
            should_block: scored.max_similarity > self.block_above,
            cleaned: scored.cleaned,
            summary: None,
        })
    }

    fn name(&self) -> &str {
        "remote_scoring"
    }
}
