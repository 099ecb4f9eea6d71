//! The bot's own identity on the chat transport.

use serde::{Deserialize, Serialize};

use crate::message::UserId;

/// Username and numeric ID of the bot account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    /// Username without the leading "@".
    pub username: String,
    /// Numeric user ID.
    pub user_id: UserId,
}

impl BotIdentity {
    /// Create an identity, stripping any leading "@" from the username.
    pub fn new(username: impl AsRef<str>, user_id: UserId) -> Self {
        Self {
            username: username.as_ref().trim_start_matches('@').to_string(),
            user_id,
        }
    }

    /// Check whether `name` refers to this bot (case-insensitive, "@" optional).
    pub fn is_username(&self, name: &str) -> bool {
        name.trim_start_matches('@').to_lowercase() == self.username.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_username() {
        let bot = BotIdentity::new("@Suzi", 99);
        assert_eq!(bot.username, "Suzi");
        assert!(bot.is_username("suzi"));
        assert!(bot.is_username("@SUZI"));
        assert!(!bot.is_username("suzika"));
        assert!(!bot.is_username(""));
    }
}
