/// More exclamation marks than this is an anomaly.
pub const EXCLAMATION_LIMIT: usize = 3;
/// Tokens must be longer than this, in UTF-16 code units, to count as
/// shouting.
pub const SHOUT_MIN_LEN: usize = 3;

pub fn count_exclamations(text: &str) -> usize {
    text.matches('!').count()
}

/// A whitespace-separated token longer than [`SHOUT_MIN_LEN`] that is
/// unchanged by upper-casing. Tokens without letters (e.g. "2024") qualify,
/// and characters outside the BMP such as emoji count as two units.
pub fn has_shouted_token(text: &str) -> bool {
    text.split_whitespace().any(|token| {
        token.encode_utf16().count() > SHOUT_MIN_LEN && token == token.to_uppercase()
    })
}

pub fn has_formatting_anomaly(text: &str) -> bool {
    count_exclamations(text) > EXCLAMATION_LIMIT || has_shouted_token(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclamation_limit() {
        assert!(!has_formatting_anomaly("wow! nice! great!"));
        assert!(has_formatting_anomaly("wow!!!!"));
        assert_eq!(count_exclamations("a!b!c"), 2);
    }

    #[test]
    fn test_shouted_tokens() {
        assert!(has_shouted_token("this is URGENT: read"));
        assert!(!has_shouted_token("an FBI agent"));
        assert!(!has_shouted_token("Hello there"));
        assert!(has_shouted_token("call 5551234 now"));
    }

    #[test]
    fn test_token_length_counts_utf16_units() {
        assert!(has_shouted_token("hi 🚨🚨 there"));
        assert!(!has_shouted_token("hi 🚨 there"));
        assert!(!has_shouted_token("ÄÖÜ ok"));
        assert!(has_shouted_token("ÄÖÜÉ ok"));
    }

    #[test]
    fn test_empty_text() {
        assert!(!has_formatting_anomaly(""));
        assert!(!has_formatting_anomaly("   "));
    }
}
