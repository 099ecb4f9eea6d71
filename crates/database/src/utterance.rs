//! Learned utterance storage.
//!
//! Rows are append-only and never pruned; reads are capped by the caller.

use sqlx::SqlitePool;

use crate::models::{ChatId, UserId, Utterance};
use crate::Result;

/// Maximum stored length of an utterance, in characters.
pub const MAX_UTTERANCE_CHARS: usize = 4000;

/// Truncate text to at most `max` characters without splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Append a learned utterance, truncating its text to [`MAX_UTTERANCE_CHARS`].
pub async fn append_utterance(
    pool: &SqlitePool,
    chat_id: ChatId,
    user_id: UserId,
    username: &str,
    text: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO utterances (chat_id, user_id, username, text)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(chat_id)
    .bind(user_id)
    .bind(username)
    .bind(truncate_chars(text, MAX_UTTERANCE_CHARS))
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the text of the most recent utterances, newest first.
pub async fn recent_utterances(pool: &SqlitePool, chat_id: ChatId, limit: i64) -> Result<Vec<String>> {
    let rows = sqlx::query_scalar::<_, String>(
        r#"
        SELECT text
        FROM utterances
        WHERE chat_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(chat_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get full utterance records for a conversation, newest first.
pub async fn list_utterances(pool: &SqlitePool, chat_id: ChatId, limit: i64) -> Result<Vec<Utterance>> {
    let rows = sqlx::query_as::<_, Utterance>(
        r#"
        SELECT id, chat_id, user_id, username, text, created_at
        FROM utterances
        WHERE chat_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(chat_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count stored utterances for a conversation.
pub async fn count_utterances(pool: &SqlitePool, chat_id: ChatId) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM utterances
        WHERE chat_id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_recent_is_newest_first_and_capped() {
        let db = Database::in_memory().await.unwrap();

        for line in ["first", "second", "third"] {
            append_utterance(db.pool(), 1, 10, "alice", line).await.unwrap();
        }
        append_utterance(db.pool(), 2, 10, "alice", "elsewhere").await.unwrap();

        let recent = recent_utterances(db.pool(), 1, 2).await.unwrap();
        assert_eq!(recent, vec!["third".to_string(), "second".to_string()]);

        assert_eq!(count_utterances(db.pool(), 1).await.unwrap(), 3);
        assert_eq!(count_utterances(db.pool(), 2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_long_text_is_truncated() {
        let db = Database::in_memory().await.unwrap();
        let long = "é".repeat(MAX_UTTERANCE_CHARS + 50);

        append_utterance(db.pool(), 1, 10, "bob", &long).await.unwrap();

        let stored = list_utterances(db.pool(), 1, 10).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text.chars().count(), MAX_UTTERANCE_CHARS);
        assert_eq!(stored[0].username, "bob");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hi", 3), "hi");
        assert_eq!(truncate_chars("வணக்கம்", 2), "வண");
    }
}
