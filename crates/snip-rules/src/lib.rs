//! Rule engine for snip
//!
//! Compiles declarative pattern rules into regex matchers and applies them
//! to a text, producing a cleaned version plus a structured record of the
//! removed fragments. Rules compose sequentially: each rule scans the text
//! as rewritten by the rules before it.

pub mod builtin;
pub mod rule;
pub mod set;

pub use rule::{ReplacePolicy, Rule, RuleSpec};
pub use set::{Applied, RuleSet, normalize};
