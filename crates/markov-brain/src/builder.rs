//! Builds a conversation's sequence model from its learned utterances.

use database::{utterance, ChatId, Database};
use tracing::{debug, warn};

use crate::chain::MarkovChain;
use crate::error::ModelError;

/// Default number of recent utterances fed into a model.
pub const DEFAULT_CORPUS_LINES: i64 = 2000;

/// Builds a fresh [`MarkovChain`] per request; nothing is cached.
#[derive(Debug, Clone)]
pub struct SequenceModelBuilder {
    database: Database,
    corpus_lines: i64,
}

impl SequenceModelBuilder {
    /// Create a builder reading up to `corpus_lines` recent utterances.
    pub fn new(database: Database, corpus_lines: i64) -> Self {
        Self {
            database,
            corpus_lines,
        }
    }

    /// Build a model, reporting why it could not be built.
    pub async fn try_build(&self, chat_id: ChatId) -> Result<MarkovChain, ModelError> {
        let lines =
            utterance::recent_utterances(self.database.pool(), chat_id, self.corpus_lines).await?;
        MarkovChain::from_lines(lines.iter().map(String::as_str))
    }

    /// Build a model, or `None` if there is nothing to build from.
    ///
    /// Storage and construction failures are logged and treated the same as
    /// an empty corpus.
    pub async fn build(&self, chat_id: ChatId) -> Option<MarkovChain> {
        match self.try_build(chat_id).await {
            Ok(chain) => {
                debug!(
                    chat_id,
                    sentences = chain.sentence_count(),
                    states = chain.state_count(),
                    "Built sequence model"
                );
                Some(chain)
            }
            Err(ModelError::EmptyCorpus) => {
                debug!(chat_id, "No learned text, no sequence model");
                None
            }
            Err(e) => {
                warn!(chat_id, "Sequence model build failed: {}", e);
                None
            }
        }
    }
}
