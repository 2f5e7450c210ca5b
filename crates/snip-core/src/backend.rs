//! Analysis backend trait

use async_trait::async_trait;

use crate::{Result, Verdict};

/// An asynchronous source of blocking decisions for the submission gate.
///
/// Exactly one assessment is requested per intercepted keystroke. A failure
/// here is treated as "allow send" by the caller, never as a hard stop.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Assess a text and produce a verdict.
    async fn assess(&self, text: &str) -> Result<Verdict>;

    /// Backend name for logging (e.g. "local_rules", "remote_scoring").
    fn name(&self) -> &str;
}
