//! Core domain models and logic for snip
//!
//! This crate contains:
//! - Domain models (RuleMatch, Analysis, Summary, Verdict)
//! - Error taxonomy shared across the workspace
//! - The analysis backend trait the submission gate resolves against

pub mod backend;
pub mod error;
pub mod model;

pub use backend::AnalysisBackend;
pub use error::{Error, Result};
pub use model::{Analysis, RuleMatch, Summary, SummaryHit, Verdict};
