//! Error types for the `warband-agents` crate.
//!
//! The decision layer itself never fails: missing targets, partners, and
//! paths are ordinary `None` results. Errors here only cover parsing data
//! that arrives from outside, such as role tags.

/// Errors that can occur while interpreting agent data.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A role tag did not match any known role.
    #[error("unknown role tag: {0:?}")]
    UnknownRole(String),
}
