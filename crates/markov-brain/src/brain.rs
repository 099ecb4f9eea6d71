//! MarkovBrain: composes replies from a conversation's learned text.

use async_trait::async_trait;
use brain_core::{Brain, BrainError, ChatId, InboundMessage, OutboundMessage};
use database::{settings, ChatSettings, Database, Language, Tone};
use tracing::{debug, info, warn};

use crate::builder::SequenceModelBuilder;
use crate::chain::MarkovChain;
use crate::config::MarkovBrainConfig;
use crate::tone::{apply_tone, fallback_greeting};

/// A brain that answers with sentences generated from learned utterances.
///
/// Replies fall back to a fixed per-language greeting whenever no sentence
/// can be generated. The conversation's tone is applied either way.
#[derive(Debug, Clone)]
pub struct MarkovBrain {
    database: Database,
    builder: SequenceModelBuilder,
    config: MarkovBrainConfig,
}

impl MarkovBrain {
    /// Create a new MarkovBrain.
    pub fn new(database: Database, config: MarkovBrainConfig) -> Self {
        let builder = SequenceModelBuilder::new(database.clone(), config.corpus_lines);
        Self {
            database,
            builder,
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MarkovBrainConfig {
        &self.config
    }

    /// Compose a reply for a conversation with the given tone and language.
    pub async fn compose(&self, chat_id: ChatId, tone: Tone, language: Language) -> String {
        match self.generate(chat_id).await {
            Some(sentence) => apply_tone(&sentence, tone),
            None => {
                debug!(chat_id, "Using fallback greeting ({})", language);
                apply_tone(fallback_greeting(language), tone)
            }
        }
    }

    /// Generate a sentence, or `None` when there is no model or every
    /// attempt failed.
    pub async fn generate(&self, chat_id: ChatId) -> Option<String> {
        let chain = self.builder.build(chat_id).await?;
        self.sample(&chain)
    }

    fn sample(&self, chain: &MarkovChain) -> Option<String> {
        let mut rng = rand::thread_rng();
        for attempt in 1..=self.config.reply_attempts {
            if let Some(sentence) = chain.try_sentence(&mut rng, self.config.sentence_tries) {
                return Some(sentence);
            }
            debug!("Generation attempt {} produced no sentence", attempt);
        }
        None
    }

    async fn settings_for(&self, chat_id: ChatId) -> ChatSettings {
        match settings::get_settings(self.database.pool(), chat_id).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(chat_id, "Failed to load settings, using defaults: {}", e);
                ChatSettings::default()
            }
        }
    }
}

#[async_trait]
impl Brain for MarkovBrain {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        let settings = self.settings_for(message.chat_id).await;
        let text = self
            .compose(message.chat_id, settings.tone, settings.language)
            .await;

        info!(
            chat_id = message.chat_id,
            "Composed reply ({} chars, tone {})",
            text.chars().count(),
            settings.tone
        );
        Ok(OutboundMessage::reply_to(&message, text))
    }

    fn name(&self) -> &str {
        "MarkovBrain"
    }
}
