use crate::config::InputConfig;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter some text to analyze")]
    Empty,
    #[error("Please enter at least {min} characters for analysis (got {actual})")]
    TooShort { min: usize, actual: usize },
}

/// Text accepted for scanning, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanInput {
    text: String,
}

impl ScanInput {
    pub fn parse(raw: &str, config: &InputConfig) -> Result<Self, InputError> {
        let text = raw.trim();
        let length = text.chars().count();

        if length == 0 {
            return Err(InputError::Empty);
        }
        if length < config.min_chars {
            return Err(InputError::TooShort {
                min: config.min_chars,
                actual: length,
            });
        }
        if length > config.max_chars {
            log::warn!(
                "Input is {} characters, above the recommended {}; analyzing anyway",
                length,
                config.max_chars
            );
        }

        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_accepts() {
        let input = ScanInput::parse("  hello there world \n", &InputConfig::default()).unwrap();
        assert_eq!(input.text(), "hello there world");
    }

    #[test]
    fn test_empty_and_whitespace() {
        let config = InputConfig::default();
        assert_eq!(ScanInput::parse("", &config), Err(InputError::Empty));
        assert_eq!(ScanInput::parse(" \t\n", &config), Err(InputError::Empty));
    }

    #[test]
    fn test_too_short_counts_characters() {
        let config = InputConfig::default();
        assert_eq!(
            ScanInput::parse("  hi there ", &config),
            Err(InputError::TooShort { min: 10, actual: 8 })
        );
        assert!(ScanInput::parse("ééééééééé", &config).is_err());
        assert!(ScanInput::parse("éééééééééé", &config).is_ok());
    }

    #[test]
    fn test_long_input_is_soft_limited() {
        let config = InputConfig {
            min_chars: 1,
            max_chars: 5,
        };
        let input = ScanInput::parse("longer than five", &config).unwrap();
        assert_eq!(input.text(), "longer than five");
    }
}
