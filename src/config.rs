use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhishGuardConfig {
    pub input: InputConfig,
    pub history: HistoryConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Minimum characters after trimming.
    pub min_chars: usize,
    /// Soft limit; longer input is still analyzed.
    pub max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub path: String,
    /// Most-recent scans kept; older ones are dropped.
    pub capacity: usize,
    /// Characters of the scanned text stored with each record.
    pub preview_chars: usize,
    /// Records shown by `--history`.
    pub recent_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
    /// OpenAI-compatible chat completions endpoint.
    pub endpoint: String,
    pub text_model: String,
    pub vision_model: String,
    /// Environment variable holding the API key. The key itself is never
    /// stored in the configuration file.
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_chars: 10,
            max_chars: 2000,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "phishguard-history.json".to_string(),
            capacity: 50,
            preview_chars: 100,
            recent_limit: 10,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            text_model: "llama-3.1-8b-instant".to_string(),
            vision_model: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: 0.1,
            timeout_seconds: 30,
        }
    }
}

impl PhishGuardConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let config: PhishGuardConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path))?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.history.capacity == 0 {
            anyhow::bail!("history.capacity must be at least 1");
        }
        if self.input.max_chars < self.input.min_chars {
            anyhow::bail!(
                "input.max_chars ({}) is smaller than input.min_chars ({})",
                self.input.max_chars,
                self.input.min_chars
            );
        }
        if self.remote.enabled && self.remote.endpoint.trim().is_empty() {
            anyhow::bail!("remote.endpoint is required when remote analysis is enabled");
        }
        if !(0.0..=2.0).contains(&self.remote.temperature) {
            anyhow::bail!("remote.temperature must be between 0.0 and 2.0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PhishGuardConfig::default();
        assert_eq!(config.input.min_chars, 10);
        assert_eq!(config.input.max_chars, 2000);
        assert_eq!(config.history.capacity, 50);
        assert_eq!(config.history.preview_chars, 100);
        assert!(!config.remote.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
history:
  capacity: 5
remote:
  enabled: true
  text_model: "custom-model"
"#;
        let config: PhishGuardConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.history.capacity, 5);
        assert_eq!(config.history.path, "phishguard-history.json");
        assert!(config.remote.enabled);
        assert_eq!(config.remote.text_model, "custom-model");
        assert_eq!(config.remote.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.input.min_chars, 10);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = PhishGuardConfig::default();
        config.history.capacity = 0;
        assert!(config.validate().is_err());

        let mut config = PhishGuardConfig::default();
        config.input.max_chars = 5;
        assert!(config.validate().is_err());

        let mut config = PhishGuardConfig::default();
        config.remote.enabled = true;
        config.remote.endpoint = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "phishguard-config-test-{}.yaml",
            std::process::id()
        ));
        let path = path.to_string_lossy().to_string();

        let mut config = PhishGuardConfig::default();
        config.history.recent_limit = 3;
        config.to_file(&path).unwrap();

        let loaded = PhishGuardConfig::from_file(&path).unwrap();
        assert_eq!(loaded.history.recent_limit, 3);
        let _ = std::fs::remove_file(&path);
    }
}
