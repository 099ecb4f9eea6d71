//! Normalized inbound and outbound message types.

use serde::{Deserialize, Serialize};

/// Conversation identifier as assigned by the chat transport.
pub type ChatId = i64;

/// User identifier as assigned by the chat transport.
pub type UserId = i64;

/// Whether a conversation is one-on-one or has several members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    /// One-on-one conversation with the bot.
    #[default]
    Private,
    /// Group conversation.
    Group,
}

impl ChatKind {
    /// Whether settings changes need an administrator.
    pub fn is_multi_party(&self) -> bool {
        matches!(self, ChatKind::Group)
    }
}

/// What a mention span refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MentionKind {
    /// An "@username" written in the text.
    Username,
    /// A mention the transport already resolved to a user ID.
    ResolvedUser { user_id: UserId },
}

/// A mention marked up by the transport.
///
/// `offset` and `length` count UTF-16 code units, as chat transports do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionSpan {
    /// Start position in the message text.
    pub offset: u32,
    /// Length of the mention.
    pub length: u32,
    /// What the span refers to.
    #[serde(flatten)]
    pub kind: MentionKind,
}

impl MentionSpan {
    /// Create a username mention span.
    pub fn username(offset: u32, length: u32) -> Self {
        Self {
            offset,
            length,
            kind: MentionKind::Username,
        }
    }

    /// Create a resolved user mention span.
    pub fn resolved(offset: u32, length: u32, user_id: UserId) -> Self {
        Self {
            offset,
            length,
            kind: MentionKind::ResolvedUser { user_id },
        }
    }

    /// Extract the text this span covers.
    ///
    /// Returns `None` if the span falls outside the text or splits a
    /// surrogate pair.
    pub fn slice(&self, text: &str) -> Option<String> {
        let units: Vec<u16> = text.encode_utf16().collect();
        let start = self.offset as usize;
        let end = start.checked_add(self.length as usize)?;
        let covered = units.get(start..end)?;
        String::from_utf16(covered).ok()
    }
}

/// A normalized incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Conversation the message was sent in.
    pub chat_id: ChatId,
    /// Kind of conversation.
    #[serde(default)]
    pub chat_kind: ChatKind,
    /// Author ID.
    pub author_id: UserId,
    /// Author display name (username or full name).
    #[serde(default)]
    pub author_name: String,
    /// Whether the author is a bot account.
    #[serde(default)]
    pub author_is_bot: bool,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// Mention spans marked up by the transport.
    #[serde(default)]
    pub mentions: Vec<MentionSpan>,
    /// Author of the message this one replies to, if any.
    #[serde(default)]
    pub reply_to_author_id: Option<UserId>,
    /// Message timestamp (milliseconds since epoch).
    #[serde(default)]
    pub timestamp: u64,
}

impl InboundMessage {
    /// Create a message in a one-on-one conversation.
    pub fn direct(chat_id: ChatId, author_id: UserId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            chat_kind: ChatKind::Private,
            author_id,
            author_name: String::new(),
            author_is_bot: false,
            text: text.into(),
            mentions: Vec::new(),
            reply_to_author_id: None,
            timestamp: 0,
        }
    }

    /// Create a message in a group conversation.
    pub fn group(chat_id: ChatId, author_id: UserId, text: impl Into<String>) -> Self {
        Self {
            chat_kind: ChatKind::Group,
            ..Self::direct(chat_id, author_id, text)
        }
    }

    /// Set the author display name.
    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = name.into();
        self
    }

    /// Add a mention span.
    pub fn with_mention(mut self, span: MentionSpan) -> Self {
        self.mentions.push(span);
        self
    }

    /// Mark the message as a reply to a message by `author_id`.
    pub fn replying_to(mut self, author_id: UserId) -> Self {
        self.reply_to_author_id = Some(author_id);
        self
    }

    /// Mark the author as a bot account.
    pub fn from_bot(mut self) -> Self {
        self.author_is_bot = true;
        self
    }
}

/// A message to send into a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Conversation to send into.
    pub chat_id: ChatId,
    /// Message text.
    pub text: String,
}

impl OutboundMessage {
    /// Create an outbound message.
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }

    /// Create a reply in the conversation `message` came from.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self::new(message.chat_id, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_slice_ascii() {
        let span = MentionSpan::username(6, 5);
        assert_eq!(span.slice("hello @suzi!").as_deref(), Some("@suzi"));
    }

    #[test]
    fn test_span_slice_counts_utf16_units() {
        // The emoji takes two UTF-16 code units.
        let text = "😀 @suzi";
        let span = MentionSpan::username(3, 5);
        assert_eq!(span.slice(text).as_deref(), Some("@suzi"));
    }

    #[test]
    fn test_span_slice_out_of_range() {
        assert!(MentionSpan::username(3, 10).slice("hi @x").is_none());
        assert!(MentionSpan::username(u32::MAX, u32::MAX).slice("hi").is_none());
    }

    #[test]
    fn test_inbound_from_json() {
        let json = r#"{
            "chat_id": -100,
            "chat_kind": "group",
            "author_id": 5,
            "text": "hi @suzi",
            "mentions": [{"offset": 3, "length": 5, "type": "username"}],
            "reply_to_author_id": 99
        }"#;
        let msg: InboundMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.chat_kind, ChatKind::Group);
        assert_eq!(msg.mentions, vec![MentionSpan::username(3, 5)]);
        assert_eq!(msg.reply_to_author_id, Some(99));
        assert!(!msg.author_is_bot);
    }

    #[test]
    fn test_resolved_mention_json() {
        let json = r#"{"offset": 0, "length": 4, "type": "resolved_user", "user_id": 42}"#;
        let span: MentionSpan = serde_json::from_str(json).unwrap();
        assert_eq!(span.kind, MentionKind::ResolvedUser { user_id: 42 });
    }

    #[test]
    fn test_reply_to() {
        let msg = InboundMessage::group(-7, 1, "hello");
        let reply = OutboundMessage::reply_to(&msg, "hi");
        assert_eq!(reply.chat_id, -7);
        assert_eq!(reply.text, "hi");
    }
}
