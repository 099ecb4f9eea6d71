//! Tone transform and fixed per-language phrases.

use database::{Language, Tone};

/// What an angry bot says when it has nothing to say.
const ANGRY_EMPTY: &str = "HMM.";

/// Apply a conversation's tone to outgoing text.
///
/// `Kind` leaves text untouched. `Angry` trims, uppercases and appends "!".
pub fn apply_tone(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Kind => text.to_string(),
        Tone::Angry => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                ANGRY_EMPTY.to_string()
            } else {
                format!("{}!", trimmed.to_uppercase())
            }
        }
    }
}

/// Greeting used when no sentence could be generated.
pub fn fallback_greeting(language: Language) -> &'static str {
    match language {
        Language::En => "Hello! I am Suzi Poo. Ask me anything.",
        Language::Ta => "வணக்கம்! நான் Suzi Poo. கேளுங்கள்.",
        Language::Hi => "नमस्ते! मैं Suzi Poo हूँ। पूछिए।",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_identity() {
        let text = "  mixed Case text ";
        assert_eq!(apply_tone(text, Tone::Kind), text);
        assert_eq!(apply_tone(&apply_tone(text, Tone::Kind), Tone::Kind), text);
    }

    #[test]
    fn test_angry_is_deterministic() {
        assert_eq!(apply_tone("hello there", Tone::Angry), "HELLO THERE!");
        assert_eq!(apply_tone(" hello there ", Tone::Angry), "HELLO THERE!");
        assert_eq!(
            apply_tone("hello there", Tone::Angry),
            apply_tone("hello there", Tone::Angry)
        );
    }

    #[test]
    fn test_angry_blank() {
        assert_eq!(apply_tone("   ", Tone::Angry), "HMM.");
    }

    #[test]
    fn test_angry_fallback() {
        assert_eq!(
            apply_tone(fallback_greeting(Language::En), Tone::Angry),
            "HELLO! I AM SUZI POO. ASK ME ANYTHING.!"
        );
    }

    #[test]
    fn test_fallbacks_differ_per_language() {
        assert_ne!(fallback_greeting(Language::En), fallback_greeting(Language::Ta));
        assert_ne!(fallback_greeting(Language::Ta), fallback_greeting(Language::Hi));
    }
}
