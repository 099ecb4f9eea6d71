//! Message orchestrator and reminder scheduler for the Suzi chat bot.
//!
//! This crate provides the [`Orchestrator`] type, which decides what (if
//! anything) to say in reply to each inbound message, and the
//! [`ReminderScheduler`], which delivers due reminders on a timer.
//!
//! # Architecture
//!
//! ```text
//! Inbound message (from the transport)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Blank text → skip                                       │
//! │         ↓                                                   │
//! │  2. /command → validate, check admin, execute, confirm      │
//! │         ↓                                                   │
//! │  3. Learn the text if the conversation opted in             │
//! │         ↓                                                   │
//! │  4. Addressed → MarkovBrain reply (tone applied)            │
//! │         ↓                                                   │
//! │  5. Shouting + angry tone → scold                           │
//! └─────────────────────────────────────────────────────────────┘
//!
//! Every 30s: ReminderScheduler → due reminders → send once → remove
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use database::Database;
//! use markov_brain::{MarkovBrain, MarkovBrainConfig};
//! use orchestrator::{InboundMessage, LoggingSender, Orchestrator, OrchestratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:suzi.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let brain = MarkovBrain::new(db.clone(), MarkovBrainConfig::from_env());
//!     let config = OrchestratorConfig::from_env()?;
//!     let orchestrator = Orchestrator::new(db, brain, LoggingSender, config);
//!
//!     let message = InboundMessage::direct(42, 42, "/help");
//!     orchestrator.handle(message).await;
//!     Ok(())
//! }
//! ```

mod commands;
mod config;
mod error;
mod orchestrator;
mod scheduler;
mod sender;
mod shout;

// Public exports
pub use commands::{format_due_at, parse_command, parse_timestamp, Command, CommandError};
pub use config::{OrchestratorConfig, DEFAULT_REMINDER_INTERVAL};
pub use error::OrchestratorError;
pub use orchestrator::{help_text, Orchestrator, ProcessResult, SCOLD_TEXT};
pub use scheduler::{reminder_text, ReminderScheduler, ScanReport};
pub use sender::{LoggingSender, MessageSender, NoOpSender};
#[cfg(any(test, feature = "test-util"))]
pub use sender::RecordingSender;
pub use shout::{is_shouting, DEFAULT_SHOUT_MIN_LEN};

// Re-export commonly used types from dependencies
pub use brain_core::{BotIdentity, ChatKind, InboundMessage, MentionSpan, OutboundMessage};
pub use markov_brain::{MarkovBrain, MarkovBrainConfig};
