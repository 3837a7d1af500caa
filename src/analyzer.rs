use crate::classifier::ContentClassifier;
use crate::detection::links::{self, ExtractedLink};
use crate::detection::{self, DetectorResult};
use crate::normalization::NormalizedContent;
use crate::verdict::{AnalysisOutput, MAX_RISK_SCORE, SUSPICIOUS_THRESHOLD};
use async_trait::async_trait;
use serde::Serialize;

pub const NO_INDICATORS_REASON: &str = "No obvious phishing indicators detected";
pub const LEGITIMATE_REASON: &str = "Text appears to be legitimate communication";
pub const VERIFY_SENDER_REASON: &str = "Always verify sender identity through official channels";

/// Scores content with the built-in detector catalogue.
///
/// Total over all inputs: the empty string, text without any signal and
/// text made only of URLs all produce a valid output.
pub fn analyze(content: &str) -> AnalysisOutput {
    score_content(content).0
}

fn score_content(content: &str) -> (AnalysisOutput, Vec<DetectorResult>) {
    let normalized = NormalizedContent::new(content);
    let results = detection::run_detectors(&normalized);
    let risk_score = aggregate_score(&results);
    let reasons = compile_reasons(&results, risk_score);

    log::debug!(
        "Heuristic score {} from {} triggered detectors",
        risk_score,
        results.iter().filter(|r| r.triggered).count()
    );

    (AnalysisOutput::new(risk_score, reasons), results)
}

/// Sum of triggered weights, capped at [`MAX_RISK_SCORE`].
pub fn aggregate_score(results: &[DetectorResult]) -> u32 {
    results
        .iter()
        .map(DetectorResult::contribution)
        .sum::<u32>()
        .min(MAX_RISK_SCORE)
}

/// One line per triggered detector in catalogue order, plus the low-risk
/// fallback and advisory lines. Never empty.
pub fn compile_reasons(results: &[DetectorResult], risk_score: u32) -> Vec<String> {
    let mut reasons: Vec<String> = results
        .iter()
        .filter(|r| r.triggered)
        .map(|r| r.category.reason().to_string())
        .collect();

    if risk_score < SUSPICIOUS_THRESHOLD {
        if reasons.is_empty() {
            reasons.push(NO_INDICATORS_REASON.to_string());
            reasons.push(LEGITIMATE_REASON.to_string());
        }
        reasons.push(VERIFY_SENDER_REASON.to_string());
    }

    reasons
}

/// Output plus the per-detector breakdown behind it.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    #[serde(flatten)]
    pub output: AnalysisOutput,
    pub signals: Vec<DetectorResult>,
    pub links: Vec<ExtractedLink>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, content: &str) -> AnalysisOutput {
        analyze(content)
    }

    pub fn explain(&self, content: &str) -> ScanReport {
        let (output, signals) = score_content(content);

        ScanReport {
            output,
            signals,
            links: links::analyze_links(content),
        }
    }
}

#[async_trait]
impl ContentClassifier for HeuristicAnalyzer {
    async fn classify(&self, content: &str) -> AnalysisOutput {
        self.analyze(content)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
