//! Core trait and types for brain implementations.
//!
//! This crate provides the shared interface between the chat transport and
//! the reply engine. It defines:
//!
//! - [`Brain`] - The trait that reply engines implement
//! - [`InboundMessage`] / [`OutboundMessage`] - Normalized message types
//! - [`MentionSpan`] - Transport-provided mention markup
//! - [`BotIdentity`] - The bot's own username and ID
//! - [`BrainError`] - Error types for brain operations
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError, InboundMessage, OutboundMessage};
//! use async_trait::async_trait;
//!
//! struct MyBrain;
//!
//! #[async_trait]
//! impl Brain for MyBrain {
//!     async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
//!         Ok(OutboundMessage::reply_to(&message, "Hello!"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyBrain"
//!     }
//! }
//! ```

mod error;
mod identity;
mod message;
mod trait_def;

pub use error::BrainError;
pub use identity::BotIdentity;
pub use message::{
    ChatId, ChatKind, InboundMessage, MentionKind, MentionSpan, OutboundMessage, UserId,
};
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
