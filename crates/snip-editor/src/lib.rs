//! Editor tracking for snip
//!
//! This crate contains:
//! - A minimal document model (node arena with attributes, children and
//!   shadow subtrees) standing in for the host page's tree
//! - Field classification into the closed {Plain, Rich} variant set
//! - The tracker that discovers editable regions and maintains the
//!   current target
//! - The command set all raw host events are translated into

pub mod command;
pub mod document;
pub mod field;
pub mod tracker;

pub use command::{Command, Key, KeyPress};
pub use document::{Document, HostAction, NodeId, ShadowMode};
pub use field::{FieldKind, FieldRef, classify};
pub use tracker::Tracker;
