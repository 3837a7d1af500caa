/// Scan content prepared for case-insensitive matching.
///
/// The original text is kept next to the lower-cased copy: formatting checks
/// need the original casing and punctuation, and URLs are extracted from it.
#[derive(Debug, Clone)]
pub struct NormalizedContent<'a> {
    original: &'a str,
    lowered: String,
}

impl<'a> NormalizedContent<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            lowered: original.to_lowercase(),
        }
    }

    pub fn original(&self) -> &'a str {
        self.original
    }

    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// True when the lower-cased text contains any of the given terms.
    pub fn contains_any(&self, terms: &[&str]) -> bool {
        terms.iter().any(|term| self.lowered.contains(term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_is_preserved() {
        let content = NormalizedContent::new("URGENT: Act Now!");
        assert_eq!(content.original(), "URGENT: Act Now!");
        assert_eq!(content.lowered(), "urgent: act now!");
    }

    #[test]
    fn test_contains_any_is_case_insensitive() {
        let content = NormalizedContent::new("Please CONFIRM YOUR identity");
        assert!(content.contains_any(&["confirm your"]));
        assert!(!content.contains_any(&["password", "ssn"]));
        assert!(!content.contains_any(&[]));
    }

    #[test]
    fn test_empty_input() {
        let content = NormalizedContent::new("");
        assert_eq!(content.lowered(), "");
        assert!(!content.contains_any(&["urgent"]));
    }
}
