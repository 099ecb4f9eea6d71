//! Error types for orchestrator operations.

use brain_core::BrainError;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Storage failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Brain processing failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Member lookup failed.
    #[error("member lookup failed: {0}")]
    LookupFailed(String),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
