//! Line-delimited JSON transport.
//!
//! Each input line is one serialized [`InboundMessage`]; each outbound
//! message is written as one `{"chat_id": .., "text": ..}` line.

use std::collections::HashSet;
use std::io::BufRead;

use async_trait::async_trait;
use brain_core::{ChatId, InboundMessage, OutboundMessage, UserId};
use orchestrator::{MessageSender, OrchestratorError};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

/// Parse one input line. Blank lines carry no message.
pub fn parse_line(line: &str) -> Result<Option<InboundMessage>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Forward messages read from `reader` into `inbound` until input ends or
/// the receiver goes away. Malformed lines are logged and skipped.
///
/// Blocks the calling thread, so run it on a dedicated thread rather than
/// inside the async runtime.
pub fn read_inbound<R: BufRead>(reader: R, inbound: mpsc::Sender<InboundMessage>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                return;
            }
        };

        match parse_line(&line) {
            Ok(Some(message)) => {
                if inbound.blocking_send(message).is_err() {
                    debug!("Inbound receiver dropped, stopping reader");
                    return;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping malformed input line: {}", e),
        }
    }
    info!("Input closed");
}

/// Sends outbound messages as JSON lines.
///
/// Admin checks are answered from a fixed set of user IDs, which count as
/// admins in every conversation.
pub struct LineSender<W> {
    writer: Mutex<W>,
    admins: HashSet<UserId>,
}

impl<W: AsyncWrite + Unpin + Send> LineSender<W> {
    /// Create a sender writing to `writer`.
    pub fn new(writer: W, admins: HashSet<UserId>) -> Self {
        Self {
            writer: Mutex::new(writer),
            admins,
        }
    }

    /// Consume the sender and return the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> MessageSender for LineSender<W> {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), OrchestratorError> {
        let mut line = serde_json::to_string(&OutboundMessage::new(chat_id, text))
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        writer
            .flush()
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn is_admin(&self, _chat_id: ChatId, user_id: UserId) -> Result<bool, OrchestratorError> {
        Ok(self.admins.contains(&user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::{ChatKind, MentionKind};

    #[test]
    fn test_parse_line() {
        let line = r#"{"chat_id": -100, "chat_kind": "group", "author_id": 5, "text": "@suzi hi",
            "mentions": [{"offset": 0, "length": 5, "type": "username"}]}"#;
        let message = parse_line(line).unwrap().unwrap();
        assert_eq!(message.chat_id, -100);
        assert_eq!(message.chat_kind, ChatKind::Group);
        assert_eq!(message.mentions.len(), 1);
        assert_eq!(message.mentions[0].kind, MentionKind::Username);
        assert!(!message.author_is_bot);
    }

    #[test]
    fn test_parse_line_defaults() {
        let message = parse_line(r#"{"chat_id": 1, "author_id": 1}"#).unwrap().unwrap();
        assert_eq!(message.chat_kind, ChatKind::Private);
        assert_eq!(message.text, "");
        assert_eq!(message.reply_to_author_id, None);
    }

    #[test]
    fn test_parse_line_blank_and_garbage() {
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("not json").is_err());
    }

    #[test]
    fn test_read_inbound_skips_bad_lines() {
        let input: &[u8] = b"{\"chat_id\": 1, \"author_id\": 2, \"text\": \"one\"}\n\
            garbage\n\
            \n\
            {\"chat_id\": 1, \"author_id\": 2, \"text\": \"two\"}\n";
        let (tx, mut rx) = mpsc::channel(8);

        read_inbound(input, tx);

        assert_eq!(rx.blocking_recv().unwrap().text, "one");
        assert_eq!(rx.blocking_recv().unwrap().text, "two");
        assert!(rx.blocking_recv().is_none());
    }

    #[tokio::test]
    async fn test_line_sender_writes_json_lines() {
        let sender = LineSender::new(Vec::new(), HashSet::from([7]));
        sender.send_message(1, "hello").await.unwrap();
        sender.send_message(-2, "🔔 Reminder: tea").await.unwrap();

        assert!(sender.is_admin(-2, 7).await.unwrap());
        assert!(!sender.is_admin(-2, 8).await.unwrap());

        let output = String::from_utf8(sender.into_inner()).unwrap();
        let lines: Vec<OutboundMessage> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(
            lines,
            vec![
                OutboundMessage::new(1, "hello"),
                OutboundMessage::new(-2, "🔔 Reminder: tea"),
            ]
        );
    }
}
