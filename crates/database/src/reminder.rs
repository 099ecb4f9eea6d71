//! Reminder queue storage.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{ChatId, Reminder, UserId};

/// Queue a reminder and return its ID.
pub async fn schedule(
    pool: &SqlitePool,
    chat_id: ChatId,
    user_id: UserId,
    message: &str,
    due_at: DateTime<Utc>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO reminders (chat_id, user_id, message, due_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(chat_id)
    .bind(user_id)
    .bind(message)
    .bind(due_at.timestamp_millis())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get every reminder due at or before `as_of`, oldest due first.
pub async fn due_reminders(pool: &SqlitePool, as_of: DateTime<Utc>) -> Result<Vec<Reminder>> {
    let rows = sqlx::query_as::<_, Reminder>(
        r#"
        SELECT id, chat_id, user_id, message, due_at
        FROM reminders
        WHERE due_at <= ?
        ORDER BY due_at ASC, id ASC
        "#,
    )
    .bind(as_of.timestamp_millis())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get the earliest due time among pending reminders.
pub async fn next_due_at(pool: &SqlitePool) -> Result<Option<DateTime<Utc>>> {
    let next = sqlx::query_scalar::<_, Option<i64>>(
        r#"
        SELECT MIN(due_at)
        FROM reminders
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(next.and_then(DateTime::from_timestamp_millis))
}

/// Get a reminder by ID.
pub async fn get_reminder(pool: &SqlitePool, id: i64) -> Result<Reminder> {
    sqlx::query_as::<_, Reminder>(
        r#"
        SELECT id, chat_id, user_id, message, due_at
        FROM reminders
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Reminder",
        id: id.to_string(),
    })
}

/// Remove a reminder. Removing a missing ID is a no-op.
///
/// Returns true if a row was deleted.
pub async fn remove(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM reminders
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
