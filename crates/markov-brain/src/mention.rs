//! Decides whether a message is directed at the bot.
//!
//! Only transport-provided mention spans and the reply chain count. The raw
//! text is never searched, so a username embedded in another word cannot
//! trigger a reply.

use brain_core::{BotIdentity, InboundMessage, MentionKind};

/// Check whether `message` addresses the bot.
///
/// A message is addressed when any of these hold:
/// - a username mention span covers exactly the bot's username
/// - a resolved mention span points at the bot's user ID
/// - the message replies to one of the bot's messages
pub fn is_addressed(message: &InboundMessage, bot: &BotIdentity) -> bool {
    let mentioned = message.mentions.iter().any(|span| match span.kind {
        MentionKind::Username => span
            .slice(&message.text)
            .is_some_and(|covered| bot.is_username(&covered)),
        MentionKind::ResolvedUser { user_id } => user_id == bot.user_id,
    });

    mentioned || message.reply_to_author_id == Some(bot.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::MentionSpan;

    fn bot() -> BotIdentity {
        BotIdentity::new("suzi", 999)
    }

    #[test]
    fn test_username_mention() {
        let msg = InboundMessage::group(1, 5, "hey @suzi how are you")
            .with_mention(MentionSpan::username(4, 5));
        assert!(is_addressed(&msg, &bot()));
    }

    #[test]
    fn test_username_mention_is_case_insensitive() {
        let msg = InboundMessage::group(1, 5, "@SuZi hi").with_mention(MentionSpan::username(0, 5));
        assert!(is_addressed(&msg, &bot()));
    }

    #[test]
    fn test_substring_in_word_is_not_a_mention() {
        let msg = InboundMessage::group(1, 5, "asuzika is here");
        assert!(!is_addressed(&msg, &bot()));

        let msg = InboundMessage::group(1, 5, "hi suzi");
        assert!(!is_addressed(&msg, &bot()));
    }

    #[test]
    fn test_mention_of_someone_else() {
        let msg = InboundMessage::group(1, 5, "@suzika hello")
            .with_mention(MentionSpan::username(0, 7));
        assert!(!is_addressed(&msg, &bot()));
    }

    #[test]
    fn test_span_must_cover_exactly_the_username() {
        // Span only covers "@suz"
        let msg = InboundMessage::group(1, 5, "@suzi hello").with_mention(MentionSpan::username(0, 4));
        assert!(!is_addressed(&msg, &bot()));
    }

    #[test]
    fn test_out_of_range_span_is_ignored() {
        let msg = InboundMessage::group(1, 5, "@suzi").with_mention(MentionSpan::username(2, 40));
        assert!(!is_addressed(&msg, &bot()));
    }

    #[test]
    fn test_resolved_mention() {
        let msg = InboundMessage::group(1, 5, "Suzi Poo look")
            .with_mention(MentionSpan::resolved(0, 8, 999));
        assert!(is_addressed(&msg, &bot()));

        let msg = InboundMessage::group(1, 5, "Bob look").with_mention(MentionSpan::resolved(0, 3, 4));
        assert!(!is_addressed(&msg, &bot()));
    }

    #[test]
    fn test_reply_to_bot() {
        let msg = InboundMessage::group(1, 5, "thanks").replying_to(999);
        assert!(is_addressed(&msg, &bot()));

        let msg = InboundMessage::group(1, 5, "thanks").replying_to(6);
        assert!(!is_addressed(&msg, &bot()));
    }
}
