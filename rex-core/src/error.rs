//! Errors in the library.
use thiserror::Error;

/// Errors raised by the core of the agent.
///
/// Failures of the injected collaborators (estimators, environments, checkpoint
/// storage) are not wrapped; they travel as [`anyhow::Error`] unchanged.
#[derive(Error, Debug, PartialEq)]
pub enum RexError {
    /// A sample was requested from a replay memory holding no experience.
    #[error("Cannot sample from an empty replay memory")]
    EmptyMemory,

    /// A configuration value was rejected at construction.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An environment received an action outside of its action set.
    #[error("Invalid action: {0}")]
    InvalidAction(usize),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
