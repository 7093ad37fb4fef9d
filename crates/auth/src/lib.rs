//! `lotkeeper-auth` — pure authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP, storage and any UI
//! framework: the session is explicit input, never ambient state.

pub mod evaluator;
pub mod roles;
pub mod session;

pub use evaluator::{
    ensure, evaluate, evaluate_named, AccessDecision, Action, Denial, DenialReason, Module,
};
pub use roles::Role;
pub use session::Session;
