// Typed errors with thiserror. Only registry and config loading can fail;
// navigation requests never produce an error.

use thiserror::Error;

use crate::types::SlideId;

/// Engine error types.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Slide registry is empty")]
    EmptyRegistry,

    #[error("Slide ids must run 1..N: position {position} expected id {expected}, found {found}")]
    NonDenseIds {
        position: usize,
        expected: u32,
        found: u32,
    },

    #[error("Slide {id} has a zero auto-advance delay")]
    InvalidDelay { id: SlideId },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
