pub mod formatting;
pub mod keywords;
pub mod links;
pub mod spoofing;

use crate::normalization::NormalizedContent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Urgency,
    CredentialRequest,
    SuspiciousLink,
    ExternalLink,
    DomainSpoofing,
    FormattingAnomaly,
    FinancialTerms,
    Impersonation,
}

impl SignalCategory {
    pub fn weight(self) -> u32 {
        match self {
            SignalCategory::Urgency => 25,
            SignalCategory::CredentialRequest => 30,
            SignalCategory::SuspiciousLink => 25,
            SignalCategory::ExternalLink => 10,
            SignalCategory::DomainSpoofing => 30,
            SignalCategory::FormattingAnomaly => 15,
            SignalCategory::FinancialTerms => 20,
            SignalCategory::Impersonation => 25,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            SignalCategory::Urgency => {
                "Urgency language detected (e.g., \"act now\", \"urgent\", \"expires\")"
            }
            SignalCategory::CredentialRequest => {
                "Credential or sensitive information request detected"
            }
            SignalCategory::SuspiciousLink => "Suspicious link structure or shortened URL detected",
            SignalCategory::ExternalLink => {
                "Contains external links - verify destination before clicking"
            }
            SignalCategory::DomainSpoofing => {
                "Possible domain spoofing or lookalike domain detected"
            }
            SignalCategory::FormattingAnomaly => {
                "Unusual formatting detected (excessive punctuation or capitalization)"
            }
            SignalCategory::FinancialTerms => "Financial transaction or monetary request mentioned",
            SignalCategory::Impersonation => {
                "Possible impersonation of trusted organization detected"
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SignalCategory::Urgency => "Urgency",
            SignalCategory::CredentialRequest => "Credential request",
            SignalCategory::SuspiciousLink => "Suspicious URL",
            SignalCategory::ExternalLink => "Generic external link",
            SignalCategory::DomainSpoofing => "Domain spoofing",
            SignalCategory::FormattingAnomaly => "Formatting anomaly",
            SignalCategory::FinancialTerms => "Financial terms",
            SignalCategory::Impersonation => "Impersonation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectorResult {
    pub category: SignalCategory,
    pub triggered: bool,
    pub weight: u32,
}

impl DetectorResult {
    pub fn new(category: SignalCategory, triggered: bool) -> Self {
        Self {
            category,
            triggered,
            weight: category.weight(),
        }
    }

    /// Points this result adds to the risk score.
    pub fn contribution(&self) -> u32 {
        if self.triggered {
            self.weight
        } else {
            0
        }
    }
}

/// Outcomes of the rules already evaluated in the current scan.
pub struct PriorResults<'r> {
    results: &'r [DetectorResult],
}

impl<'r> PriorResults<'r> {
    pub fn new(results: &'r [DetectorResult]) -> Self {
        Self { results }
    }

    pub fn triggered(&self, category: SignalCategory) -> bool {
        self.results
            .iter()
            .any(|result| result.category == category && result.triggered)
    }
}

type Predicate = fn(&NormalizedContent<'_>, &PriorResults<'_>) -> bool;

pub struct DetectorRule {
    pub category: SignalCategory,
    predicate: Predicate,
}

impl DetectorRule {
    pub fn evaluate(
        &self,
        content: &NormalizedContent<'_>,
        prior: &PriorResults<'_>,
    ) -> DetectorResult {
        DetectorResult::new(self.category, (self.predicate)(content, prior))
    }
}

/// Detector rules in evaluation order. Reasons are reported in this order and
/// later rules may read the outcome of earlier ones.
pub static CATALOGUE: [DetectorRule; 8] = [
    DetectorRule {
        category: SignalCategory::Urgency,
        predicate: urgency,
    },
    DetectorRule {
        category: SignalCategory::CredentialRequest,
        predicate: credential_request,
    },
    DetectorRule {
        category: SignalCategory::SuspiciousLink,
        predicate: suspicious_link,
    },
    DetectorRule {
        category: SignalCategory::ExternalLink,
        predicate: external_link,
    },
    DetectorRule {
        category: SignalCategory::DomainSpoofing,
        predicate: domain_spoofing,
    },
    DetectorRule {
        category: SignalCategory::FormattingAnomaly,
        predicate: formatting_anomaly,
    },
    DetectorRule {
        category: SignalCategory::FinancialTerms,
        predicate: financial_terms,
    },
    DetectorRule {
        category: SignalCategory::Impersonation,
        predicate: impersonation,
    },
];

fn urgency(content: &NormalizedContent<'_>, _prior: &PriorResults<'_>) -> bool {
    keywords::has_urgency(content)
}

fn credential_request(content: &NormalizedContent<'_>, _prior: &PriorResults<'_>) -> bool {
    keywords::requests_credentials(content)
}

fn suspicious_link(content: &NormalizedContent<'_>, _prior: &PriorResults<'_>) -> bool {
    links::has_suspicious_url(content.original())
}

fn external_link(content: &NormalizedContent<'_>, prior: &PriorResults<'_>) -> bool {
    !prior.triggered(SignalCategory::SuspiciousLink) && links::has_urls(content.original())
}

fn domain_spoofing(content: &NormalizedContent<'_>, _prior: &PriorResults<'_>) -> bool {
    spoofing::has_lookalike_domain(content)
}

fn formatting_anomaly(content: &NormalizedContent<'_>, _prior: &PriorResults<'_>) -> bool {
    formatting::has_formatting_anomaly(content.original())
}

fn financial_terms(content: &NormalizedContent<'_>, _prior: &PriorResults<'_>) -> bool {
    keywords::mentions_financial_terms(content)
}

fn impersonation(content: &NormalizedContent<'_>, prior: &PriorResults<'_>) -> bool {
    keywords::impersonates_trusted_organization(
        content,
        prior.triggered(SignalCategory::Urgency),
        prior.triggered(SignalCategory::CredentialRequest),
    )
}

/// Runs every rule of the catalogue, in order, over the content.
pub fn run_detectors(content: &NormalizedContent<'_>) -> Vec<DetectorResult> {
    let mut results: Vec<DetectorResult> = Vec::with_capacity(CATALOGUE.len());

    for rule in CATALOGUE.iter() {
        let result = rule.evaluate(content, &PriorResults::new(&results));
        if result.triggered {
            log::debug!(
                "Detector '{}' triggered (+{})",
                result.category.label(),
                result.weight
            );
        }
        results.push(result);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triggered(text: &str) -> Vec<SignalCategory> {
        run_detectors(&NormalizedContent::new(text))
            .into_iter()
            .filter(|r| r.triggered)
            .map(|r| r.category)
            .collect()
    }

    #[test]
    fn test_catalogue_order_and_weights() {
        let categories: Vec<SignalCategory> = CATALOGUE.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                SignalCategory::Urgency,
                SignalCategory::CredentialRequest,
                SignalCategory::SuspiciousLink,
                SignalCategory::ExternalLink,
                SignalCategory::DomainSpoofing,
                SignalCategory::FormattingAnomaly,
                SignalCategory::FinancialTerms,
                SignalCategory::Impersonation,
            ]
        );

        let total: u32 = CATALOGUE.iter().map(|r| r.category.weight()).sum();
        assert_eq!(total, 180);
    }

    #[test]
    fn test_every_rule_reports_a_result() {
        let results = run_detectors(&NormalizedContent::new(""));
        assert_eq!(results.len(), CATALOGUE.len());
        assert!(results.iter().all(|r| !r.triggered));
        assert!(results.iter().all(|r| r.contribution() == 0));
    }

    #[test]
    fn test_link_branches_are_mutually_exclusive() {
        let suspicious = triggered("Go to http://bit.ly/abc today");
        assert!(suspicious.contains(&SignalCategory::SuspiciousLink));
        assert!(!suspicious.contains(&SignalCategory::ExternalLink));

        let generic = triggered("See http://example.com/page for the agenda");
        assert!(generic.contains(&SignalCategory::ExternalLink));
        assert!(!generic.contains(&SignalCategory::SuspiciousLink));

        let none = triggered("No links in this message at all");
        assert!(!none.contains(&SignalCategory::ExternalLink));
        assert!(!none.contains(&SignalCategory::SuspiciousLink));
    }

    #[test]
    fn test_impersonation_requires_urgency_or_credentials() {
        let brand_only = triggered("your google calendar invite for tomorrow");
        assert!(!brand_only.contains(&SignalCategory::Impersonation));

        let with_urgency = triggered("google says this is urgent");
        assert!(with_urgency.contains(&SignalCategory::Urgency));
        assert!(with_urgency.contains(&SignalCategory::Impersonation));

        let with_credentials = triggered("microsoft needs your password");
        assert!(with_credentials.contains(&SignalCategory::CredentialRequest));
        assert!(with_credentials.contains(&SignalCategory::Impersonation));
    }

    #[test]
    fn test_prior_results_lookup() {
        let results = vec![
            DetectorResult::new(SignalCategory::Urgency, true),
            DetectorResult::new(SignalCategory::CredentialRequest, false),
        ];
        let prior = PriorResults::new(&results);
        assert!(prior.triggered(SignalCategory::Urgency));
        assert!(!prior.triggered(SignalCategory::CredentialRequest));
        assert!(!prior.triggered(SignalCategory::Impersonation));
    }
}
