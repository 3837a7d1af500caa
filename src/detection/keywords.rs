use crate::normalization::NormalizedContent;

pub const URGENCY_TERMS: &[&str] = &[
    "urgent",
    "immediate",
    "act now",
    "limited time",
    "expires",
    "verify now",
    "suspend",
    "locked",
    "unusual activity",
];

pub const CREDENTIAL_TERMS: &[&str] = &[
    "password",
    "credit card",
    "ssn",
    "social security",
    "account number",
    "pin",
    "verify your",
    "confirm your",
];

pub const FINANCIAL_TERMS: &[&str] = &[
    "refund",
    "payment",
    "invoice",
    "transaction",
    "bank",
    "paypal",
    "wire transfer",
    "prize",
    "winner",
];

pub const TRUSTED_ORGANIZATIONS: &[&str] = &[
    "amazon",
    "paypal",
    "microsoft",
    "apple",
    "google",
    "irs",
    "government",
    "bank of",
];

pub fn has_urgency(content: &NormalizedContent<'_>) -> bool {
    content.contains_any(URGENCY_TERMS)
}

pub fn requests_credentials(content: &NormalizedContent<'_>) -> bool {
    content.contains_any(CREDENTIAL_TERMS)
}

pub fn mentions_financial_terms(content: &NormalizedContent<'_>) -> bool {
    content.contains_any(FINANCIAL_TERMS)
}

/// A trusted name only counts as impersonation alongside pressure or a
/// request for secrets, so both outcomes are passed in rather than rescanned.
pub fn impersonates_trusted_organization(
    content: &NormalizedContent<'_>,
    has_urgency: bool,
    requests_credentials: bool,
) -> bool {
    (has_urgency || requests_credentials) && content.contains_any(TRUSTED_ORGANIZATIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_terms() {
        assert!(has_urgency(&NormalizedContent::new("Limited Time offer")));
        assert!(has_urgency(&NormalizedContent::new(
            "We noticed unusual activity on your profile"
        )));
        assert!(!has_urgency(&NormalizedContent::new("See you at lunch")));
    }

    #[test]
    fn test_credential_terms_match_substrings() {
        assert!(requests_credentials(&NormalizedContent::new(
            "Enter your SSN below"
        )));
        // "pin" is matched anywhere, including inside longer words.
        assert!(requests_credentials(&NormalizedContent::new(
            "Free shipping on all orders"
        )));
        assert!(!requests_credentials(&NormalizedContent::new(
            "Dinner is at eight"
        )));
    }

    #[test]
    fn test_financial_terms() {
        assert!(mentions_financial_terms(&NormalizedContent::new(
            "You are our lucky WINNER"
        )));
        assert!(mentions_financial_terms(&NormalizedContent::new(
            "Your invoice is attached"
        )));
        assert!(!mentions_financial_terms(&NormalizedContent::new(
            "Happy birthday!"
        )));
    }

    #[test]
    fn test_impersonation_depends_on_prior_signals() {
        let content = NormalizedContent::new("A message from the Bank of Somewhere");
        assert!(!impersonates_trusted_organization(&content, false, false));
        assert!(impersonates_trusted_organization(&content, true, false));
        assert!(impersonates_trusted_organization(&content, false, true));

        let unbranded = NormalizedContent::new("A message from a friend");
        assert!(!impersonates_trusted_organization(&unbranded, true, true));
    }
}
