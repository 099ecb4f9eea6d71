//! Configuration for MarkovBrain.

use std::env;

use crate::builder::DEFAULT_CORPUS_LINES;

/// Default random walks per generation attempt.
const DEFAULT_SENTENCE_TRIES: usize = 50;

/// Default generation attempts before falling back to a greeting.
const DEFAULT_REPLY_ATTEMPTS: usize = 6;

/// Configuration for MarkovBrain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkovBrainConfig {
    /// Number of recent utterances used to build a model.
    pub corpus_lines: i64,

    /// Random walks tried inside one generation attempt.
    pub sentence_tries: usize,

    /// Generation attempts per reply before falling back.
    pub reply_attempts: usize,
}

impl Default for MarkovBrainConfig {
    fn default() -> Self {
        Self {
            corpus_lines: DEFAULT_CORPUS_LINES,
            sentence_tries: DEFAULT_SENTENCE_TRIES,
            reply_attempts: DEFAULT_REPLY_ATTEMPTS,
        }
    }
}

impl MarkovBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `SUZI_CORPUS_LINES` - Recent utterances per model (default: 2000)
    /// - `SUZI_SENTENCE_TRIES` - Walks per attempt (default: 50)
    /// - `SUZI_REPLY_ATTEMPTS` - Attempts per reply (default: 6)
    pub fn from_env() -> Self {
        let corpus_lines = env::var("SUZI_CORPUS_LINES")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &i64| *n > 0)
            .unwrap_or(DEFAULT_CORPUS_LINES);

        let sentence_tries = env::var("SUZI_SENTENCE_TRIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SENTENCE_TRIES);

        let reply_attempts = env::var("SUZI_REPLY_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_REPLY_ATTEMPTS);

        Self {
            corpus_lines,
            sentence_tries,
            reply_attempts,
        }
    }

    /// Set the corpus size.
    pub fn with_corpus_lines(mut self, corpus_lines: i64) -> Self {
        self.corpus_lines = corpus_lines;
        self
    }

    /// Set the attempts per reply.
    pub fn with_reply_attempts(mut self, reply_attempts: usize) -> Self {
        self.reply_attempts = reply_attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MarkovBrainConfig::default();
        assert_eq!(config.corpus_lines, 2000);
        assert_eq!(config.sentence_tries, 50);
        assert_eq!(config.reply_attempts, 6);
    }

    #[test]
    fn test_builders() {
        let config = MarkovBrainConfig::default()
            .with_corpus_lines(10)
            .with_reply_attempts(1);
        assert_eq!(config.corpus_lines, 10);
        assert_eq!(config.reply_attempts, 1);
    }
}
