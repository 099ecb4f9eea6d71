//! Error types for sequence model construction.

use database::DatabaseError;
use thiserror::Error;

/// Reasons a sequence model could not be built.
///
/// None of these reach the user; the builder turns every one of them into
/// "no model" and the reply falls back to a fixed greeting.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The conversation has no usable learned text.
    #[error("corpus is empty")]
    EmptyCorpus,

    /// The transition table could not be sampled.
    #[error("degenerate transition table: {0}")]
    Degenerate(String),

    /// Learned text could not be read.
    #[error("corpus unavailable: {0}")]
    Store(#[from] DatabaseError),
}
