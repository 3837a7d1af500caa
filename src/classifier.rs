//! Pluggable classifiers sharing the `analyze` contract, so the built-in
//! heuristics and a remote model can be swapped or run side by side.

use crate::verdict::AnalysisOutput;
use async_trait::async_trait;
use serde::Serialize;

#[async_trait]
pub trait ContentClassifier: Send + Sync {
    /// Classify the content. Implementations never fail: a classifier that
    /// cannot reach its backend returns a degraded verdict instead.
    async fn classify(&self, content: &str) -> AnalysisOutput;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub primary_name: String,
    pub primary: AnalysisOutput,
    pub secondary_name: String,
    pub secondary: AnalysisOutput,
    /// Both classifiers assigned the same tier.
    pub agree: bool,
    /// Secondary score minus primary score.
    pub score_delta: i64,
}

pub async fn compare(
    primary: &dyn ContentClassifier,
    secondary: &dyn ContentClassifier,
    content: &str,
) -> Comparison {
    let (first, second) = tokio::join!(primary.classify(content), secondary.classify(content));

    let comparison = Comparison {
        primary_name: primary.name().to_string(),
        agree: first.status == second.status,
        score_delta: i64::from(second.risk_score) - i64::from(first.risk_score),
        primary: first,
        secondary_name: secondary.name().to_string(),
        secondary: second,
    };

    if !comparison.agree {
        log::info!(
            "Classifiers disagree: {} says {}, {} says {}",
            comparison.primary_name,
            comparison.primary.status,
            comparison.secondary_name,
            comparison.secondary.status
        );
    }

    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::HeuristicAnalyzer;
    use crate::verdict::Status;

    struct FixedClassifier(u32);

    #[async_trait]
    impl ContentClassifier for FixedClassifier {
        async fn classify(&self, _content: &str) -> AnalysisOutput {
            AnalysisOutput::new(self.0, vec!["fixed".to_string()])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_compare_reports_agreement() {
        let heuristic = HeuristicAnalyzer::new();
        let remote = FixedClassifier(5);

        let comparison = compare(&heuristic, &remote, "Lunch at noon tomorrow?").await;
        assert!(comparison.agree);
        assert_eq!(comparison.primary_name, "heuristic");
        assert_eq!(comparison.secondary_name, "fixed");
        assert_eq!(comparison.score_delta, 5);
    }

    #[tokio::test]
    async fn test_compare_reports_disagreement() {
        let heuristic = HeuristicAnalyzer::new();
        let remote = FixedClassifier(90);

        let text = "Check out this link: http://example.com/page";
        let comparison = compare(&heuristic, &remote, text).await;
        assert!(!comparison.agree);
        assert_eq!(comparison.primary.status, Status::Safe);
        assert_eq!(comparison.secondary.status, Status::Phishing);
        assert_eq!(comparison.score_delta, 80);
    }

    #[tokio::test]
    async fn test_classifiers_are_object_safe() {
        let classifiers: Vec<Box<dyn ContentClassifier>> =
            vec![Box::new(HeuristicAnalyzer::new()), Box::new(FixedClassifier(40))];

        let mut statuses = Vec::new();
        for classifier in &classifiers {
            statuses.push(classifier.classify("hello there friend").await.status);
        }
        assert_eq!(statuses, vec![Status::Safe, Status::Suspicious]);
    }
}
