use crate::normalization::NormalizedContent;

pub const SPOOFED_BRANDS: &[&str] = &[
    "paypal",
    "amazon",
    "microsoft",
    "apple",
    "google",
    "facebook",
    "netflix",
];

/// Single-character swaps. Each applies to the first occurrence only.
const CHARACTER_SWAPS: &[(char, &str)] = &[('l', "1"), ('o', "0"), ('a', "@")];

const LOOKALIKE_SUFFIXES: &[&str] = &["-verify", "-secure", "-support"];

/// Lookalike spellings of a brand.
///
/// A swap whose letter does not occur in the brand yields nothing, so the
/// plain brand name is never one of its own variants.
pub fn lookalike_variants(brand: &str) -> Vec<String> {
    let mut variants: Vec<String> = CHARACTER_SWAPS
        .iter()
        .filter(|(from, _)| brand.contains(*from))
        .map(|(from, to)| brand.replacen(*from, to, 1))
        .collect();

    variants.extend(
        LOOKALIKE_SUFFIXES
            .iter()
            .map(|suffix| format!("{}{}", brand, suffix)),
    );
    variants
}

pub fn has_lookalike_domain(content: &NormalizedContent<'_>) -> bool {
    SPOOFED_BRANDS.iter().any(|brand| {
        lookalike_variants(brand)
            .iter()
            .any(|variant| content.lowered().contains(variant.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_swap_first_occurrence_only() {
        let variants = lookalike_variants("paypal");
        assert_eq!(
            variants,
            vec![
                "paypa1".to_string(),
                "p@ypal".to_string(),
                "paypal-verify".to_string(),
                "paypal-secure".to_string(),
                "paypal-support".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_letters_produce_no_variant() {
        let variants = lookalike_variants("microsoft");
        assert_eq!(variants[0], "micr0soft");
        assert!(!variants.contains(&"microsoft".to_string()));
        assert_eq!(variants.len(), 4);
    }

    #[test]
    fn test_lookalike_detection() {
        assert!(has_lookalike_domain(&NormalizedContent::new(
            "Sign in at www.g0ogle.com"
        )));
        assert!(has_lookalike_domain(&NormalizedContent::new(
            "Contact NETFLIX-SUPPORT today"
        )));
        assert!(has_lookalike_domain(&NormalizedContent::new(
            "Your @pple ID"
        )));
        assert!(!has_lookalike_domain(&NormalizedContent::new(
            "Your amazon order has shipped"
        )));
        // Only the first 'o' is swapped, so a second-letter swap is not a variant.
        assert!(!has_lookalike_domain(&NormalizedContent::new("go0gle")));
    }
}
