//! Main orchestrator that coordinates message processing.

use std::future::Future;

use brain_core::{BotIdentity, Brain, ChatId, InboundMessage, OutboundMessage, UserId};
use database::{reminder, settings, utterance, Database, SettingValue, Tone};
use markov_brain::is_addressed;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::commands::{format_due_at, parse_command, Command, CommandError};
use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;
use crate::sender::MessageSender;
use crate::shout::is_shouting;

/// Reply to shouting in a conversation set to the angry tone.
pub const SCOLD_TEXT: &str = "😡 Calm down please!";

/// Help text shown for `/start` and `/help`.
pub fn help_text(bot: &BotIdentity) -> String {
    format!(
        "Hi, I'm Suzi Poo 🐣\n\
         Commands:\n\
         /learn_on (admin only)\n\
         /learn_off (admin only)\n\
         /settone <kind|angry>\n\
         /setlang <en|ta|hi>\n\
         /remind <YYYY-MM-DD HH:MM> | <message>\n\n\
         Mention me (@{}) to get a reply.",
        bot.username
    )
}

/// Result of handling one inbound message.
#[derive(Debug)]
pub enum ProcessResult {
    /// A reply was produced and sent.
    Responded { chat_id: ChatId, response: String },
    /// Nothing needed saying.
    Skipped { reason: String },
    /// Handling or delivery failed.
    Error(OrchestratorError),
}

/// Main orchestrator that coordinates message processing.
///
/// For every inbound message the orchestrator:
/// - answers commands, enforcing admin rights in multi-party conversations
/// - learns the text when the conversation has learning enabled
/// - asks the brain for a reply when the bot is addressed
/// - scolds shouting when the conversation's tone is angry
///
/// At most one reply is produced per message.
pub struct Orchestrator<B: Brain, S: MessageSender> {
    database: Database,
    brain: B,
    sender: S,
    config: OrchestratorConfig,
}

impl<B: Brain, S: MessageSender> Orchestrator<B, S> {
    /// Create a new orchestrator with the given components.
    pub fn new(database: Database, brain: B, sender: S, config: OrchestratorConfig) -> Self {
        Self {
            database,
            brain,
            sender,
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Get the message sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Get the brain.
    pub fn brain(&self) -> &B {
        &self.brain
    }

    /// Decide the reply to a message, if any, without sending it.
    pub async fn process(
        &self,
        message: &InboundMessage,
    ) -> Result<Option<OutboundMessage>, OrchestratorError> {
        let text = message.text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        if text.starts_with('/') {
            let Some(parsed) = parse_command(text, &self.config.bot) else {
                debug!(chat_id = message.chat_id, "Ignoring unhandled command");
                return Ok(None);
            };
            let reply = match parsed {
                Ok(command) => self.execute(message, command).await?,
                Err(e) => e.to_string(),
            };
            return Ok(Some(OutboundMessage::reply_to(message, reply)));
        }

        self.learn(message, text).await;

        if is_addressed(message, &self.config.bot) {
            debug!(chat_id = message.chat_id, "Bot addressed, asking {}", self.brain.name());
            let reply = self.brain.process(message.clone()).await?;
            return Ok(Some(reply));
        }

        if is_shouting(text, self.config.shout_min_len) && self.tone_for(message.chat_id).await == Tone::Angry
        {
            debug!(chat_id = message.chat_id, "Scolding shouting");
            return Ok(Some(OutboundMessage::reply_to(message, SCOLD_TEXT)));
        }

        Ok(None)
    }

    /// Process a message and send the reply, if any.
    pub async fn handle(&self, message: InboundMessage) -> ProcessResult {
        match self.process(&message).await {
            Ok(Some(reply)) => match self.sender.send_message(reply.chat_id, &reply.text).await {
                Ok(()) => ProcessResult::Responded {
                    chat_id: reply.chat_id,
                    response: reply.text,
                },
                Err(e) => ProcessResult::Error(e),
            },
            Ok(None) => ProcessResult::Skipped {
                reason: "no reply needed".to_string(),
            },
            Err(e) => ProcessResult::Error(e),
        }
    }

    /// Handle inbound messages until the channel closes or the shutdown
    /// signal completes.
    pub async fn run_with_shutdown<F>(&self, mut inbound: mpsc::Receiver<InboundMessage>, shutdown_signal: F)
    where
        F: Future<Output = ()> + Send,
    {
        info!("Starting orchestrator with brain: {}", self.brain.name());

        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping orchestrator");
                    break;
                }

                next = inbound.recv() => {
                    let Some(message) = next else {
                        info!("Inbound stream ended");
                        break;
                    };
                    match self.handle(message).await {
                        ProcessResult::Responded { chat_id, response } => {
                            debug!("Responded to {}: {}", chat_id, response);
                        }
                        ProcessResult::Skipped { reason } => {
                            debug!("Skipped: {}", reason);
                        }
                        ProcessResult::Error(e) => {
                            warn!("Error processing message: {}", e);
                        }
                    }
                }
            }
        }

        if let Err(e) = self.brain.shutdown().await {
            warn!("Error during brain shutdown: {}", e);
        }
    }

    async fn execute(
        &self,
        message: &InboundMessage,
        command: Command,
    ) -> Result<String, OrchestratorError> {
        let chat_id = message.chat_id;
        let pool = self.database.pool();

        if let Command::SetLearning(enable) = command {
            if message.chat_kind.is_multi_party() && !self.is_admin(chat_id, message.author_id).await {
                info!(chat_id, user_id = message.author_id, "Denied learning toggle");
                return Ok(CommandError::LearningDenied { enable }.to_string());
            }
        }

        let reply = match command {
            Command::Help => help_text(&self.config.bot),
            Command::SetLearning(enabled) => {
                settings::set_learning_enabled(pool, chat_id, enabled).await?;
                info!(chat_id, enabled, "Learning toggled");
                if enabled {
                    "Learning ENABLED for this chat.".to_string()
                } else {
                    "Learning DISABLED for this chat.".to_string()
                }
            }
            Command::SetTone(tone) => {
                settings::set_setting(pool, chat_id, SettingValue::Tone(tone)).await?;
                info!(chat_id, "Tone set to {}", tone);
                format!("Tone set to {}", tone)
            }
            Command::SetLanguage(language) => {
                settings::set_setting(pool, chat_id, SettingValue::Language(language)).await?;
                info!(chat_id, "Language set to {}", language);
                format!("Language set to {}", language)
            }
            Command::Remind { due_at, message: text } => {
                let id = reminder::schedule(pool, chat_id, message.author_id, &text, due_at).await?;
                info!(chat_id, reminder_id = id, "Reminder scheduled for {}", due_at);
                format!("Reminder set for {} (UTC assumed).", format_due_at(&due_at))
            }
        };
        Ok(reply)
    }

    async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> bool {
        match self.sender.is_admin(chat_id, user_id).await {
            Ok(is_admin) => is_admin,
            // Fail closed: an unknown membership never grants the toggle.
            Err(e) => {
                warn!(chat_id, user_id, "Admin lookup failed, denying: {}", e);
                false
            }
        }
    }

    /// Store the text if the conversation is learning. Failures are logged
    /// and never interrupt message handling.
    async fn learn(&self, message: &InboundMessage, text: &str) {
        if message.author_is_bot {
            return;
        }

        let pool = self.database.pool();
        match settings::is_learning_enabled(pool, message.chat_id).await {
            Ok(true) => {
                if let Err(e) = utterance::append_utterance(
                    pool,
                    message.chat_id,
                    message.author_id,
                    &message.author_name,
                    text,
                )
                .await
                {
                    warn!(chat_id = message.chat_id, "Failed to store utterance: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => {
                warn!(chat_id = message.chat_id, "Failed to read learning flag: {}", e);
            }
        }
    }

    async fn tone_for(&self, chat_id: ChatId) -> Tone {
        settings::get_tone(self.database.pool(), chat_id)
            .await
            .unwrap_or_else(|e| {
                warn!(chat_id, "Failed to read tone, using default: {}", e);
                Tone::default()
            })
    }
}
