//! Message sender trait and implementations.

#[cfg(any(test, feature = "test-util"))]
use std::collections::HashSet;
use std::sync::Arc;
#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-util"))]
use brain_core::OutboundMessage;
use brain_core::{ChatId, UserId};

use crate::error::OrchestratorError;

/// Outbound capability of the chat transport.
///
/// Abstracted to support different transports (stdout lines, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message to a conversation.
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), OrchestratorError>;

    /// Check whether `user_id` administers the multi-party conversation `chat_id`.
    async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> Result<bool, OrchestratorError>;
}

#[async_trait]
impl<T: MessageSender + ?Sized> MessageSender for Arc<T> {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), OrchestratorError> {
        (**self).send_message(chat_id, text).await
    }

    async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> Result<bool, OrchestratorError> {
        (**self).is_admin(chat_id, user_id).await
    }
}

/// A no-op message sender that discards all messages and knows no admins.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send_message(&self, _chat_id: ChatId, _text: &str) -> Result<(), OrchestratorError> {
        Ok(())
    }

    async fn is_admin(&self, _chat_id: ChatId, _user_id: UserId) -> Result<bool, OrchestratorError> {
        Ok(false)
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), OrchestratorError> {
        tracing::info!("Sending message to {}: {}", chat_id, text);
        Ok(())
    }

    async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> Result<bool, OrchestratorError> {
        tracing::info!("Admin lookup for {} in {}", user_id, chat_id);
        Ok(false)
    }
}

/// A sender that records everything it is asked to send.
///
/// Admins are configured up front. Sends can be made to fail so delivery
/// error paths are observable. Available to other crates' tests through
/// the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundMessage>>,
    admins: HashSet<(ChatId, UserId)>,
    fail_sends: bool,
    fail_lookups: bool,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingSender {
    /// Create a sender with no admins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `user_id` as an admin of `chat_id`.
    pub fn with_admin(mut self, chat_id: ChatId, user_id: UserId) -> Self {
        self.admins.insert((chat_id, user_id));
        self
    }

    /// Make every send fail. Failed sends are still recorded.
    pub fn failing(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Make every admin lookup fail.
    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Texts sent so far, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.text).collect()
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), OrchestratorError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(OutboundMessage::new(chat_id, text));
        }
        if self.fail_sends {
            return Err(OrchestratorError::SendFailed(format!(
                "delivery to {} refused",
                chat_id
            )));
        }
        Ok(())
    }

    async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> Result<bool, OrchestratorError> {
        if self.fail_lookups {
            return Err(OrchestratorError::LookupFailed(format!(
                "member {} of {} unavailable",
                user_id, chat_id
            )));
        }
        Ok(self.admins.contains(&(chat_id, user_id)))
    }
}
