//! Configuration loaded from environment variables.

use std::collections::HashSet;
use std::env;
use std::path::Path;

use brain_core::UserId;
use markov_brain::MarkovBrainConfig;
use orchestrator::{OrchestratorConfig, OrchestratorError};

/// Default SQLite database location.
const DEFAULT_SQLITE_PATH: &str = "./data/suzi.db";

/// Bot process configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// SQLite database URL.
    pub database_url: String,
    /// Users treated as admins of every multi-party conversation.
    pub admin_ids: HashSet<UserId>,
    /// Orchestrator and scheduler settings.
    pub orchestrator: OrchestratorConfig,
    /// Reply generation settings.
    pub brain: MarkovBrainConfig,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SQLITE_PATH` | SQLite file path or `sqlite:` URL | `./data/suzi.db` |
    /// | `SUZI_BOT_USERNAME` | Bot username | (required) |
    /// | `SUZI_BOT_ID` | Bot numeric user ID | (required) |
    /// | `SUZI_ADMIN_IDS` | Comma-separated admin user IDs | (none) |
    ///
    /// See [`OrchestratorConfig::from_env`] and [`MarkovBrainConfig::from_env`]
    /// for the remaining variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let sqlite_path = env::var("SQLITE_PATH").unwrap_or_else(|_| DEFAULT_SQLITE_PATH.to_string());
        let admin_ids = parse_admin_ids(&env::var("SUZI_ADMIN_IDS").unwrap_or_default())?;

        Ok(Self {
            database_url: database_url(&sqlite_path),
            admin_ids,
            orchestrator: OrchestratorConfig::from_env()?,
            brain: MarkovBrainConfig::from_env(),
        })
    }

    /// Directory the database file lives in, if it is a file on disk.
    pub fn database_dir(&self) -> Option<&Path> {
        let path = self.database_url.strip_prefix("sqlite:")?;
        let path = path.split('?').next()?.trim_start_matches("//");
        if path.is_empty() || path == ":memory:" {
            return None;
        }
        Path::new(path).parent().filter(|dir| !dir.as_os_str().is_empty())
    }
}

/// Turn a file path into a SQLite URL. URLs are passed through.
fn database_url(sqlite_path: &str) -> String {
    if sqlite_path.starts_with("sqlite:") {
        sqlite_path.to_string()
    } else {
        format!("sqlite:{}", sqlite_path)
    }
}

fn parse_admin_ids(raw: &str) -> Result<HashSet<UserId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse()
                .map_err(|_| ConfigError::InvalidAdminId(id.to_string()))
        })
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    Orchestrator(#[from] OrchestratorError),

    #[error("SUZI_ADMIN_IDS contains an invalid user ID: {0}")]
    InvalidAdminId(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::BotIdentity;

    fn config_with_url(url: &str) -> BotConfig {
        BotConfig {
            database_url: url.to_string(),
            admin_ids: HashSet::new(),
            orchestrator: OrchestratorConfig::new(BotIdentity::new("suzi", 1)),
            brain: MarkovBrainConfig::default(),
        }
    }

    #[test]
    fn test_database_url() {
        assert_eq!(database_url("./data/suzi.db"), "sqlite:./data/suzi.db");
        assert_eq!(
            database_url("sqlite:suzi.db?mode=rwc"),
            "sqlite:suzi.db?mode=rwc"
        );
    }

    #[test]
    fn test_database_dir() {
        let config = config_with_url("sqlite:./data/suzi.db");
        assert_eq!(config.database_dir(), Some(Path::new("./data")));

        let config = config_with_url("sqlite:suzi.db?mode=rwc");
        assert_eq!(config.database_dir(), None);

        let config = config_with_url("sqlite::memory:");
        assert_eq!(config.database_dir(), None);
    }

    #[test]
    fn test_parse_admin_ids() {
        let ids = parse_admin_ids("1, 2,,-3").unwrap();
        assert_eq!(ids, HashSet::from([1, 2, -3]));
        assert!(parse_admin_ids("").unwrap().is_empty());
        assert!(matches!(
            parse_admin_ids("1,bob"),
            Err(ConfigError::InvalidAdminId(id)) if id == "bob"
        ));
    }
}
