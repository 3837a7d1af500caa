use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores below this are SAFE.
pub const SUSPICIOUS_THRESHOLD: u32 = 30;
/// Scores at or above this are PHISHING.
pub const PHISHING_THRESHOLD: u32 = 60;
pub const MAX_RISK_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Safe,
    Suspicious,
    Phishing,
}

impl Status {
    /// Three-tier mapping with no hysteresis.
    pub fn from_score(risk_score: u32) -> Self {
        match risk_score {
            score if score >= PHISHING_THRESHOLD => Status::Phishing,
            score if score >= SUSPICIOUS_THRESHOLD => Status::Suspicious,
            _ => Status::Safe,
        }
    }

    /// Case-insensitive parse of the labels used on the wire.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "SAFE" => Some(Status::Safe),
            "SUSPICIOUS" => Some(Status::Suspicious),
            "PHISHING" => Some(Status::Phishing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Safe => "SAFE",
            Status::Suspicious => "SUSPICIOUS",
            Status::Phishing => "PHISHING",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Status::Safe => "✅",
            Status::Suspicious => "⚠️",
            Status::Phishing => "🚨",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutput {
    pub status: Status,
    pub risk_score: u32,
    pub reasons: Vec<String>,
}

impl AnalysisOutput {
    /// Builds an output whose status always agrees with the clamped score.
    pub fn new(risk_score: u32, reasons: Vec<String>) -> Self {
        let risk_score = risk_score.min(MAX_RISK_SCORE);
        Self {
            status: Status::from_score(risk_score),
            risk_score,
            reasons,
        }
    }
}
