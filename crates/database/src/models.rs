//! Database models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Conversation identifier as assigned by the chat transport.
pub type ChatId = i64;

/// User identifier as assigned by the chat transport.
pub type UserId = i64;

/// Output style applied to everything the bot says in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Text passes through unchanged.
    #[default]
    Kind,
    /// Text is uppercased and gets a trailing "!".
    Angry,
}

impl Tone {
    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Kind => "kind",
            Tone::Angry => "angry",
        }
    }

    /// Parse a tone from user input (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kind" => Some(Tone::Kind),
            "angry" => Some(Tone::Angry),
            _ => None,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language used for fixed bot phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Tamil.
    Ta,
    /// Hindi.
    Hi,
}

impl Language {
    /// Stored representation (ISO 639-1 code).
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ta => "ta",
            Language::Hi => "hi",
        }
    }

    /// Parse a language code from user input (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Some(Language::En),
            "ta" => Some(Language::Ta),
            "hi" => Some(Language::Hi),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Whether messages in this conversation are learned.
    pub learning_enabled: bool,
    /// Output tone.
    pub tone: Tone,
    /// Language for fixed phrases.
    pub language: Language,
}

/// Raw settings row. Unknown stored values fall back to defaults.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ChatSettingsRow {
    pub learn_enabled: bool,
    pub tone: String,
    pub lang: String,
}

impl From<ChatSettingsRow> for ChatSettings {
    fn from(row: ChatSettingsRow) -> Self {
        Self {
            learning_enabled: row.learn_enabled,
            tone: Tone::parse(&row.tone).unwrap_or_default(),
            language: Language::parse(&row.lang).unwrap_or_default(),
        }
    }
}

/// A learned line of conversation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Utterance {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Conversation the line was said in.
    pub chat_id: ChatId,
    /// Author ID.
    pub user_id: UserId,
    /// Author display name at the time.
    pub username: String,
    /// Message text (truncated on insert).
    pub text: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A pending reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    /// Auto-incrementing ID, never reused.
    pub id: i64,
    /// Conversation to deliver into.
    pub chat_id: ChatId,
    /// User who asked for the reminder.
    pub user_id: UserId,
    /// Reminder text.
    pub message: String,
    /// Due time as Unix milliseconds (UTC).
    pub due_at: i64,
}

impl Reminder {
    /// Due time as a UTC instant.
    pub fn due_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.due_at)
    }
}
