//! Detection of all-caps "shouting" messages.

/// Default length a message must exceed before it can count as shouting.
pub const DEFAULT_SHOUT_MIN_LEN: usize = 3;

/// Check whether `text` is shouting.
///
/// The text must contain at least one cased letter, no lowercase letters,
/// and more than `min_len` characters after trimming.
pub fn is_shouting(text: &str, min_len: usize) -> bool {
    let text = text.trim();
    text.chars().count() > min_len
        && text.chars().any(char::is_uppercase)
        && !text.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shouting() {
        assert!(is_shouting("STOP IT", DEFAULT_SHOUT_MIN_LEN));
        assert!(is_shouting("WHY?!", DEFAULT_SHOUT_MIN_LEN));
        assert!(is_shouting("ÉTÉ!", DEFAULT_SHOUT_MIN_LEN));
    }

    #[test]
    fn test_not_shouting() {
        assert!(!is_shouting("Stop it", DEFAULT_SHOUT_MIN_LEN));
        assert!(!is_shouting("1234 !!", DEFAULT_SHOUT_MIN_LEN));
        assert!(!is_shouting("", DEFAULT_SHOUT_MIN_LEN));
        // Scripts without case never shout
        assert!(!is_shouting("வணக்கம்", DEFAULT_SHOUT_MIN_LEN));
    }

    #[test]
    fn test_threshold() {
        assert!(!is_shouting("HEY", 3));
        assert!(is_shouting("HEYY", 3));
        assert!(!is_shouting("HEYY", 4));
        assert!(is_shouting("HEY", 2));
        // Surrounding whitespace does not count
        assert!(!is_shouting("  HEY  ", 3));
    }
}
