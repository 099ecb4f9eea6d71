//! Markov-chain reply brain.
//!
//! This crate turns a conversation's learned utterances into short generated
//! replies. It provides:
//!
//! - [`MarkovChain`] - a second-order chain over newline-separated text
//! - [`SequenceModelBuilder`] - builds a chain per conversation on demand
//! - [`is_addressed`] - decides whether a message is aimed at the bot
//! - [`apply_tone`] / [`fallback_greeting`] - output styling and fixed phrases
//! - [`MarkovBrain`] - the [`Brain`] implementation tying them together
//!
//! # Example
//!
//! ```no_run
//! use database::Database;
//! use markov_brain::{Brain, InboundMessage, MarkovBrain, MarkovBrainConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:suzi.db?mode=rwc").await?;
//! db.migrate().await?;
//!
//! let brain = MarkovBrain::new(db, MarkovBrainConfig::from_env());
//! let reply = brain.process(InboundMessage::direct(1, 2, "@suzi hi")).await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

mod brain;
mod builder;
mod chain;
mod config;
mod error;
mod mention;
mod tone;

pub use brain::MarkovBrain;
pub use builder::{SequenceModelBuilder, DEFAULT_CORPUS_LINES};
pub use chain::{MarkovChain, MAX_WALK_WORDS};
pub use config::MarkovBrainConfig;
pub use error::ModelError;
pub use mention::is_addressed;
pub use tone::{apply_tone, fallback_greeting};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BotIdentity, Brain, BrainError, InboundMessage, OutboundMessage};
