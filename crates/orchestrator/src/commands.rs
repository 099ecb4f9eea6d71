//! Slash-command parsing and validation.
//!
//! Everything a user types after `/` is validated here, before any store is
//! touched. Bad input becomes a [`CommandError`] whose display text is the
//! corrective message sent back to the user.

use brain_core::BotIdentity;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use database::{Language, Tone};
use thiserror::Error;

/// Naive timestamp layouts accepted by `/remind`, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying timestamp layouts accepted by `/remind`. A trailing `Z`
/// is read as `+00:00` first.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// A validated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `/help`.
    Help,
    /// `/learn_on` or `/learn_off`. Admin only in multi-party conversations.
    SetLearning(bool),
    /// `/settone kind|angry`.
    SetTone(Tone),
    /// `/setlang en|ta|hi`.
    SetLanguage(Language),
    /// `/remind <when> | <message>`.
    Remind {
        due_at: DateTime<Utc>,
        message: String,
    },
}

/// A rejected command. The display text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: /settone kind|angry")]
    ToneUsage,

    #[error("Tone must be kind or angry.")]
    InvalidTone,

    #[error("Usage: /setlang en|ta|hi")]
    LanguageUsage,

    #[error("Language must be en, ta, or hi")]
    InvalidLanguage,

    #[error("Usage: /remind <YYYY-MM-DD HH:MM> | <message>")]
    RemindUsage,

    #[error("Couldn't parse datetime. Use 'YYYY-MM-DD HH:MM'")]
    InvalidDatetime,

    /// A non-admin tried to toggle learning in a multi-party conversation.
    #[error("Only group admins can {} learning.", toggle_verb(.enable))]
    LearningDenied { enable: bool },
}

fn toggle_verb(enable: &bool) -> &'static str {
    if *enable {
        "enable"
    } else {
        "disable"
    }
}

/// Parse a message as a command.
///
/// Returns `None` when the text is not a command this bot handles: plain
/// text, unknown commands, and commands suffixed with another bot's name.
pub fn parse_command(text: &str, bot: &BotIdentity) -> Option<Result<Command, CommandError>> {
    let text = text.trim();
    let body = text.strip_prefix('/')?;

    let (head, rest) = match body.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (body, ""),
    };

    let name = match head.split_once('@') {
        Some((name, target)) => {
            if !bot.is_username(target) {
                return None;
            }
            name
        }
        None => head,
    };

    let command = match name.to_lowercase().as_str() {
        "start" | "help" => Ok(Command::Help),
        "learn_on" => Ok(Command::SetLearning(true)),
        "learn_off" => Ok(Command::SetLearning(false)),
        "settone" => parse_tone(rest),
        "setlang" => parse_language(rest),
        "remind" => parse_reminder(rest),
        _ => return None,
    };
    Some(command)
}

fn parse_tone(args: &str) -> Result<Command, CommandError> {
    let arg = args.split_whitespace().next().ok_or(CommandError::ToneUsage)?;
    Tone::parse(arg)
        .map(Command::SetTone)
        .ok_or(CommandError::InvalidTone)
}

fn parse_language(args: &str) -> Result<Command, CommandError> {
    let arg = args
        .split_whitespace()
        .next()
        .ok_or(CommandError::LanguageUsage)?;
    Language::parse(arg)
        .map(Command::SetLanguage)
        .ok_or(CommandError::InvalidLanguage)
}

fn parse_reminder(args: &str) -> Result<Command, CommandError> {
    let (when, message) = args.split_once('|').ok_or(CommandError::RemindUsage)?;
    let message = message.trim();
    if message.is_empty() {
        return Err(CommandError::RemindUsage);
    }

    let due_at = parse_timestamp(when).ok_or(CommandError::InvalidDatetime)?;
    Ok(Command::Remind {
        due_at,
        message: message.to_string(),
    })
}

/// Parse a reminder timestamp into an absolute UTC instant.
///
/// Accepts RFC 3339 with an offset, ISO-8601 and `YYYY-MM-DD HH:MM` forms
/// with optional seconds and optional offset, and a bare date (midnight).
/// Forms without an offset are taken as UTC.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    let zoned = match input.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => input.to_string(),
    };
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&zoned, format).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Render a reminder instant the way confirmations show it.
pub fn format_due_at(due_at: &DateTime<Utc>) -> String {
    due_at.format("%Y-%m-%dT%H:%M:%S").to_string()
}
