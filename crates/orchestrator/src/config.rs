//! Configuration for the orchestrator.

use std::env;
use std::time::Duration;

use brain_core::BotIdentity;

use crate::error::OrchestratorError;
use crate::shout::DEFAULT_SHOUT_MIN_LEN;

/// Default interval between reminder scans.
pub const DEFAULT_REMINDER_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for the orchestrator and its reminder scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// The bot's own account.
    pub bot: BotIdentity,

    /// Length a message must exceed to count as shouting.
    pub shout_min_len: usize,

    /// Interval between reminder scans.
    pub reminder_interval: Duration,
}

impl OrchestratorConfig {
    /// Create a configuration with defaults for the given bot.
    pub fn new(bot: BotIdentity) -> Self {
        Self {
            bot,
            shout_min_len: DEFAULT_SHOUT_MIN_LEN,
            reminder_interval: DEFAULT_REMINDER_INTERVAL,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `SUZI_BOT_USERNAME` - The bot's username ("@" optional)
    /// - `SUZI_BOT_ID` - The bot's numeric user ID
    ///
    /// Optional environment variables:
    /// - `SUZI_SHOUT_MIN_LEN` - Length a message must exceed to shout (default: 3)
    /// - `SUZI_REMINDER_INTERVAL_SECS` - Reminder scan interval (default: 30)
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let username = env::var("SUZI_BOT_USERNAME")
            .map_err(|_| OrchestratorError::Config("SUZI_BOT_USERNAME not set".to_string()))?;
        if username.trim_start_matches('@').trim().is_empty() {
            return Err(OrchestratorError::Config(
                "SUZI_BOT_USERNAME is empty".to_string(),
            ));
        }

        let user_id = env::var("SUZI_BOT_ID")
            .map_err(|_| OrchestratorError::Config("SUZI_BOT_ID not set".to_string()))?
            .trim()
            .parse::<i64>()
            .map_err(|e| OrchestratorError::Config(format!("SUZI_BOT_ID is not a number: {}", e)))?;

        let shout_min_len = env::var("SUZI_SHOUT_MIN_LEN")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SHOUT_MIN_LEN);

        let reminder_interval = env::var("SUZI_REMINDER_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REMINDER_INTERVAL);

        Ok(Self {
            bot: BotIdentity::new(username.trim(), user_id),
            shout_min_len,
            reminder_interval,
        })
    }

    /// Set the shouting threshold.
    pub fn with_shout_min_len(mut self, shout_min_len: usize) -> Self {
        self.shout_min_len = shout_min_len;
        self
    }

    /// Set the reminder scan interval.
    pub fn with_reminder_interval(mut self, interval: Duration) -> Self {
        self.reminder_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::new(BotIdentity::new("@suzi", 1));
        assert_eq!(config.bot.username, "suzi");
        assert_eq!(config.shout_min_len, 3);
        assert_eq!(config.reminder_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_builders() {
        let config = OrchestratorConfig::new(BotIdentity::new("suzi", 1))
            .with_shout_min_len(4)
            .with_reminder_interval(Duration::from_secs(5));
        assert_eq!(config.shout_min_len, 4);
        assert_eq!(config.reminder_interval, Duration::from_secs(5));
    }
}
