//! The closed command set
//!
//! Every raw host event (focus, input, mutation observation, visibility
//! change, keydown) is translated into one of these commands before it
//! reaches the tracker or the submission gate.

use crate::document::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    /// True while the keystroke is part of an IME composition.
    pub composing: bool,
}

impl KeyPress {
    pub fn enter() -> Self {
        Self {
            key: Key::Enter,
            shift: false,
            ctrl: false,
            alt: false,
            meta: false,
            composing: false,
        }
    }

    pub fn shift_enter() -> Self {
        Self {
            shift: true,
            ..Self::enter()
        }
    }

    /// A submission gesture: Enter with no modifiers, outside composition.
    pub fn is_submission(&self) -> bool {
        self.key == Key::Enter
            && !self.shift
            && !self.ctrl
            && !self.alt
            && !self.meta
            && !self.composing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Initial load or an explicit re-scan request.
    Rescan,
    /// Structural change observer saw an insertion.
    NodeInserted(NodeId),
    /// Structural change observer saw an attribute change.
    AttributeChanged(NodeId),
    /// Tab visibility regained.
    VisibilityRegained,
    /// An editable region gained focus.
    FocusTarget(NodeId),
    /// An editable region's content changed.
    TextChanged(NodeId),
    /// A submission keystroke was observed.
    SubmitAttempt(KeyPress),
    /// The dismissal gesture (Escape) was observed.
    Dismiss,
}
