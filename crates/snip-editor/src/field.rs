//! Field classification and the weak target handle

use serde::{Deserialize, Serialize};

use crate::document::{Document, HostAction, NodeId};

/// The closed set of editable region variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Plain multi-line text input.
    Plain,
    /// Rich editable region (contenteditable or an accessible textbox).
    Rich,
}

/// Capability test: a node qualifies as an editable region when it is a
/// plain multi-line input, marked fully or partially contenteditable, or
/// carries an explicit textbox role. Detached nodes never qualify.
pub fn classify(doc: &Document, id: NodeId) -> Option<FieldKind> {
    if !doc.is_attached(id) {
        return None;
    }
    match doc.tag(id)? {
        "textarea" => Some(FieldKind::Plain),
        _ => {
            let editable = matches!(
                doc.attr(id, "contenteditable"),
                Some("" | "true" | "plaintext-only")
            );
            if editable || doc.attr(id, "role") == Some("textbox") {
                Some(FieldKind::Rich)
            } else {
                None
            }
        }
    }
}

/// Weak handle to the current target: a node id plus the tracker
/// generation it was adopted at. Resolved against the document on every
/// use; never extends the node's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    pub node: NodeId,
    pub generation: u64,
    pub kind: FieldKind,
}

impl FieldRef {
    pub fn is_valid(&self, doc: &Document) -> bool {
        classify(doc, self.node).is_some()
    }

    pub fn read(&self, doc: &Document) -> Option<String> {
        if !self.is_valid(doc) {
            return None;
        }
        doc.text(self.node).map(|t| t.to_string())
    }

    /// Replace the region's content and re-fire an input notification so
    /// the host page's own state updates. No-op on a stale handle.
    pub fn write(&self, doc: &mut Document, text: &str) -> bool {
        if !self.is_valid(doc) {
            return false;
        }
        doc.set_text(self.node, text);
        doc.push_action(HostAction::InputNotified(self.node));
        true
    }
}
