//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur during brain processing.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The brain is temporarily unavailable.
    #[error("brain unavailable: {0}")]
    Unavailable(String),
}
