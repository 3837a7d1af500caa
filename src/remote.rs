//! Classification through an OpenAI-compatible chat completion API.
//!
//! The model is asked for a JSON verdict which is mapped onto
//! [`AnalysisOutput`]. Any failure (missing key, transport error, HTTP error,
//! unparsable reply) degrades to a neutral verdict when used through
//! [`ContentClassifier`].

use crate::classifier::ContentClassifier;
use crate::config::RemoteConfig;
use crate::verdict::{
    AnalysisOutput, Status, MAX_RISK_SCORE, PHISHING_THRESHOLD, SUSPICIOUS_THRESHOLD,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

pub const UNAVAILABLE_REASON: &str = "Remote analysis unavailable";

const CLASSIFICATION_RULES: &str = "Classification rules:
- Legitimate advertisements, investment promotions and product announcements are not phishing \
unless they ask for passwords, OTPs or credentials, or push the reader to suspicious links.
- Marketing phrases such as \"limited period\", \"launch alert\" or \"invest now\" are not phishing on their own.
- Use PHISHING only for social engineering, impersonation or credential harvesting.";

const VERDICT_FORMAT: &str = "Return ONLY valid JSON with:
{
  \"label\": \"SAFE\" | \"SUSPICIOUS\" | \"PHISHING\",
  \"risk_score\": number from 0 (safe) to 100 (confirmed phishing),
  \"phishing_type\": \"string\" | \"None\",
  \"reasons\": \"concise expert reasoning\"
}";

pub fn build_text_prompt(content: &str) -> String {
    format!(
        "You are a cybersecurity system.\n\
         Analyze the message below and classify it as SAFE, SUSPICIOUS or PHISHING.\n\n\
         {}\n\n{}\n\nMessage: \"{}\"",
        CLASSIFICATION_RULES, VERDICT_FORMAT, content
    )
}

pub fn build_image_prompt() -> String {
    format!(
        "You are a cybersecurity system. Analyze this image for phishing or scam indicators. \
         Read any text in it and examine the visual cues.\n\n{}\n\n{}",
        CLASSIFICATION_RULES, VERDICT_FORMAT
    )
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Verdict as the model returns it. Every field is optional because models
/// do not reliably follow the requested shape.
#[derive(Debug, Default, Deserialize)]
struct ModelVerdict {
    label: Option<String>,
    risk_score: Option<Value>,
    phishing_type: Option<String>,
    reasons: Option<Value>,
}

/// Maps a model reply onto an [`AnalysisOutput`].
///
/// The status always follows from the score, as for the heuristic analyzer.
/// The label is only used when the reply has no usable score, in which case
/// the score is the lower bound of the labelled tier.
pub fn parse_verdict(raw: &str) -> Result<AnalysisOutput> {
    let verdict: ModelVerdict =
        serde_json::from_str(raw.trim()).context("Model reply is not a JSON verdict")?;

    let score = verdict.risk_score.as_ref().and_then(score_from_value);
    let label = verdict.label.as_deref().and_then(Status::from_label);

    let risk_score = match (score, label) {
        (Some(score), _) => score,
        (None, Some(status)) => tier_floor(status),
        (None, None) => anyhow::bail!("Model reply has neither a label nor a risk score"),
    };

    let mut reasons = verdict
        .reasons
        .as_ref()
        .map(reasons_from_value)
        .unwrap_or_default();

    if let Some(kind) = verdict.phishing_type.as_deref().map(str::trim) {
        if !kind.is_empty() && !kind.eq_ignore_ascii_case("none") {
            reasons.push(format!("Phishing type: {}", kind));
        }
    }

    if reasons.is_empty() {
        reasons.push("No explanation provided by the model".to_string());
    }

    let output = AnalysisOutput::new(risk_score, reasons);
    if let Some(label) = label {
        if label != output.status {
            log::debug!(
                "Model labelled {} but scored {}; using {}",
                label,
                output.risk_score,
                output.status
            );
        }
    }
    Ok(output)
}

fn score_from_value(value: &Value) -> Option<u32> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok()?,
        _ => return None,
    };
    if !score.is_finite() {
        return None;
    }
    Some(score.round().clamp(0.0, f64::from(MAX_RISK_SCORE)) as u32)
}

fn reasons_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn tier_floor(status: Status) -> u32 {
    match status {
        Status::Safe => 0,
        Status::Suspicious => SUSPICIOUS_THRESHOLD,
        Status::Phishing => PHISHING_THRESHOLD,
    }
}

/// Neutral verdict returned when the remote model cannot be used.
pub fn degraded(cause: impl Display) -> AnalysisOutput {
    AnalysisOutput {
        status: Status::Safe,
        risk_score: 0,
        reasons: vec![
            format!("{}: {}", UNAVAILABLE_REASON, cause),
            "This result is neutral; rely on the heuristic scan or verify manually".to_string(),
        ],
    }
}

/// Encodes an image file as a `data:` URL for vision models.
pub fn image_data_url(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => anyhow::bail!("Unsupported image type: {}", path.display()),
    };

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image: {}", path.display()))?;
    Ok(format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(bytes)
    ))
}

pub struct RemoteClassifier {
    client: reqwest::Client,
    config: RemoteConfig,
    api_key: Option<String>,
}

impl RemoteClassifier {
    /// Reads the API key from the environment variable named in the config.
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            log::warn!(
                "{} is not set; remote analysis will not be available",
                config.api_key_env
            );
        }
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &RemoteConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("PhishGuard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn classify_text(&self, content: &str) -> Result<AnalysisOutput> {
        let reply = self
            .complete(&self.config.text_model, json!(build_text_prompt(content)))
            .await?;
        parse_verdict(&reply)
    }

    pub async fn classify_image(&self, path: &Path) -> Result<AnalysisOutput> {
        let data_url = image_data_url(path)?;
        let content = json!([
            { "type": "text", "text": build_image_prompt() },
            { "type": "image_url", "image_url": { "url": data_url } }
        ]);
        let reply = self.complete(&self.config.vision_model, content).await?;
        parse_verdict(&reply)
    }

    async fn complete(&self, model: &str, content: Value) -> Result<String> {
        let api_key = self.api_key.as_deref().with_context(|| {
            format!(
                "Remote classifier is not configured (set {})",
                self.config.api_key_env
            )
        })?;

        let body = json!({
            "messages": [{ "role": "user", "content": content }],
            "model": model,
            "temperature": self.config.temperature,
            "response_format": { "type": "json_object" }
        });

        log::debug!("Requesting remote verdict from {} ({})", self.config.endpoint, model);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("Remote classifier request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail: String = detail.chars().take(200).collect();
            anyhow::bail!("Remote classifier returned HTTP {}: {}", status, detail);
        }

        let reply: ChatResponse = response
            .json()
            .await
            .context("Unexpected response shape from remote classifier")?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("Remote classifier returned no content")
    }
}

#[async_trait]
impl ContentClassifier for RemoteClassifier {
    async fn classify(&self, content: &str) -> AnalysisOutput {
        match self.classify_text(content).await {
            Ok(output) => output,
            Err(e) => {
                log::error!("Remote classification failed: {:#}", e);
                degraded(e)
            }
        }
    }

    fn name(&self) -> &str {
        "remote"
    }
}
