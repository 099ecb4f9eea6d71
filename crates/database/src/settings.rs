//! Per-conversation settings storage.
//!
//! One row per conversation, created lazily on first write. Every accessor uses
//! a fixed statement chosen by [`SettingKey`]; no column name is ever built from
//! input. Upserts only touch their own column, so concurrent writes to sibling
//! fields never clobber each other (last writer wins per field).

use sqlx::SqlitePool;

use crate::models::{ChatId, ChatSettings, ChatSettingsRow, Language, Tone};
use crate::Result;

/// A setting that can be read or written on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// Output tone.
    Tone,
    /// Fixed-phrase language.
    Language,
}

impl SettingKey {
    /// Get the database column name for this key.
    pub fn column_name(&self) -> &'static str {
        match self {
            SettingKey::Tone => "tone",
            SettingKey::Language => "lang",
        }
    }

    /// Value returned when a conversation has no settings row.
    pub fn default_value(&self) -> SettingValue {
        match self {
            SettingKey::Tone => SettingValue::Tone(Tone::default()),
            SettingKey::Language => SettingValue::Language(Language::default()),
        }
    }

    fn select_query(&self) -> &'static str {
        match self {
            SettingKey::Tone => "SELECT tone FROM chat_settings WHERE chat_id = ?",
            SettingKey::Language => "SELECT lang FROM chat_settings WHERE chat_id = ?",
        }
    }

    fn upsert_query(&self) -> &'static str {
        match self {
            SettingKey::Tone => {
                r#"
                INSERT INTO chat_settings (chat_id, tone)
                VALUES (?, ?)
                ON CONFLICT(chat_id) DO UPDATE SET
                    tone = excluded.tone,
                    updated_at = datetime('now')
                "#
            }
            SettingKey::Language => {
                r#"
                INSERT INTO chat_settings (chat_id, lang)
                VALUES (?, ?)
                ON CONFLICT(chat_id) DO UPDATE SET
                    lang = excluded.lang,
                    updated_at = datetime('now')
                "#
            }
        }
    }
}

/// An already-validated setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingValue {
    Tone(Tone),
    Language(Language),
}

impl SettingValue {
    /// The key this value belongs to.
    pub fn key(&self) -> SettingKey {
        match self {
            SettingValue::Tone(_) => SettingKey::Tone,
            SettingValue::Language(_) => SettingKey::Language,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SettingValue::Tone(tone) => tone.as_str(),
            SettingValue::Language(language) => language.as_str(),
        }
    }

    fn parse(key: SettingKey, raw: &str) -> Self {
        match key {
            SettingKey::Tone => SettingValue::Tone(Tone::parse(raw).unwrap_or_default()),
            SettingKey::Language => {
                SettingValue::Language(Language::parse(raw).unwrap_or_default())
            }
        }
    }
}

/// Check whether learning is enabled. Absent rows mean disabled.
pub async fn is_learning_enabled(pool: &SqlitePool, chat_id: ChatId) -> Result<bool> {
    let enabled = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT learn_enabled
        FROM chat_settings
        WHERE chat_id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?;

    Ok(enabled.unwrap_or(false))
}

/// Turn learning on or off, keeping tone and language as they are.
pub async fn set_learning_enabled(pool: &SqlitePool, chat_id: ChatId, enabled: bool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_settings (chat_id, learn_enabled)
        VALUES (?, ?)
        ON CONFLICT(chat_id) DO UPDATE SET
            learn_enabled = excluded.learn_enabled,
            updated_at = datetime('now')
        "#,
    )
    .bind(chat_id)
    .bind(enabled)
    .execute(pool)
    .await?;

    Ok(())
}

/// Read a single setting, or its default if the conversation has no row.
pub async fn get_setting(pool: &SqlitePool, chat_id: ChatId, key: SettingKey) -> Result<SettingValue> {
    let raw = sqlx::query_scalar::<_, String>(key.select_query())
        .bind(chat_id)
        .fetch_optional(pool)
        .await?;

    Ok(match raw {
        Some(raw) => SettingValue::parse(key, &raw),
        None => key.default_value(),
    })
}

/// Write a single setting without touching the others.
pub async fn set_setting(pool: &SqlitePool, chat_id: ChatId, value: SettingValue) -> Result<()> {
    sqlx::query(value.key().upsert_query())
        .bind(chat_id)
        .bind(value.as_str())
        .execute(pool)
        .await?;

    Ok(())
}

/// Read the conversation's tone.
pub async fn get_tone(pool: &SqlitePool, chat_id: ChatId) -> Result<Tone> {
    match get_setting(pool, chat_id, SettingKey::Tone).await? {
        SettingValue::Tone(tone) => Ok(tone),
        SettingValue::Language(_) => Ok(Tone::default()),
    }
}

/// Read the conversation's language.
pub async fn get_language(pool: &SqlitePool, chat_id: ChatId) -> Result<Language> {
    match get_setting(pool, chat_id, SettingKey::Language).await? {
        SettingValue::Language(language) => Ok(language),
        SettingValue::Tone(_) => Ok(Language::default()),
    }
}

/// Read all settings at once, defaulting when no row exists.
pub async fn get_settings(pool: &SqlitePool, chat_id: ChatId) -> Result<ChatSettings> {
    let row = sqlx::query_as::<_, ChatSettingsRow>(
        r#"
        SELECT learn_enabled, tone, lang
        FROM chat_settings
        WHERE chat_id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ChatSettings::from).unwrap_or_default())
}
