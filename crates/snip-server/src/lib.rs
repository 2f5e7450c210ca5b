//! Session and control API for snip
//!
//! The session is the page-scoped context object: it owns the document,
//! tracker, analyzer, gate and presenter, and the two single-value slots
//! (current target lives in the tracker, latest summary here). The server
//! exposes the control surface other processes talk to.

pub mod server;
pub mod session;

pub use server::{ControlServer, serve};
pub use session::{Session, load_rules};
