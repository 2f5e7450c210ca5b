//! Editable region tracker
//!
//! Discovers editable regions as the document mutates, instruments each
//! one at most once, and maintains the single current target.

use std::collections::HashSet;

use tracing::debug;

use crate::command::Command;
use crate::document::{Document, NodeId};
use crate::field::{FieldRef, classify};

#[derive(Debug, Default)]
pub struct Tracker {
    /// Identity set of regions already instrumented. Re-scans skip these,
    /// so a region is attached at most once for its lifetime.
    instrumented: HashSet<NodeId>,
    current: Option<FieldRef>,
    generation: u64,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk everything a structural scan can see and instrument any new
    /// editable regions. Idempotent; returns the number newly attached.
    pub fn scan(&mut self, doc: &Document) -> usize {
        let mut added = 0;
        for id in doc.scannable_ids() {
            if classify(doc, id).is_some() && self.instrumented.insert(id) {
                debug!(node = id, "instrumented editable region");
                added += 1;
            }
        }
        added
    }

    pub fn is_instrumented(&self, id: NodeId) -> bool {
        self.instrumented.contains(&id)
    }

    /// The current target, re-validated against the document. A target
    /// that has since detached resolves to none; the slot itself is a
    /// weak back-reference and is not cleared eagerly.
    pub fn current(&self, doc: &Document) -> Option<FieldRef> {
        self.current.filter(|target| target.is_valid(doc))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Route a command. `SubmitAttempt` and `Dismiss` belong to the
    /// submission gate and are ignored here.
    pub fn handle(&mut self, doc: &Document, command: &Command) {
        match command {
            Command::Rescan
            | Command::NodeInserted(_)
            | Command::AttributeChanged(_)
            | Command::VisibilityRegained => {
                self.scan(doc);
            }
            Command::FocusTarget(id) | Command::TextChanged(id) => {
                self.adopt(doc, *id);
            }
            Command::SubmitAttempt(_) | Command::Dismiss => {}
        }
    }

    /// Make a node the current target if it (or something on its composed
    /// path, or the focused element) classifies as editable. This is the
    /// fallback discovery for regions a structural scan could not see,
    /// e.g. inside closed shadow subtrees.
    pub fn adopt(&mut self, doc: &Document, id: NodeId) -> bool {
        let candidate = self
            .resolve_candidate(doc, id)
            .or_else(|| doc.focused().and_then(|f| self.resolve_candidate(doc, f)));

        let Some((node, kind)) = candidate else {
            return false;
        };

        if self.instrumented.insert(node) {
            debug!(node, "instrumented region via interaction fallback");
        }

        match self.current {
            Some(existing) if existing.node == node => {}
            _ => {
                self.generation += 1;
                self.current = Some(FieldRef {
                    node,
                    generation: self.generation,
                    kind,
                });
            }
        }
        true
    }

    fn resolve_candidate(
        &self,
        doc: &Document,
        id: NodeId,
    ) -> Option<(NodeId, crate::field::FieldKind)> {
        doc.composed_path(id)
            .into_iter()
            .find_map(|n| classify(doc, n).map(|kind| (n, kind)))
    }
}
