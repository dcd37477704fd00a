use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use summarizer_core::COPY_FEEDBACK_WINDOW;
use summarizer_engine::SummarizeSettings;

pub const CONFIG_FILENAME: &str = "summarizer.ron";

const ENV_API_KEY: &str = "SUMMARIZER_API_KEY";
const ENV_API_HOST: &str = "SUMMARIZER_API_HOST";
const ENV_API_URL: &str = "SUMMARIZER_API_URL";
const ENV_STORE_DIR: &str = "SUMMARIZER_STORE_DIR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub api_host: String,
    pub api_key: Option<String>,
    pub summary_length: u8,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub store_dir: PathBuf,
    pub copy_feedback_ms: u64,
    pub log_file: PathBuf,
    pub log_to_stderr: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = SummarizeSettings::default();
        Self {
            api_url: settings.base_url,
            api_host: settings.api_host,
            api_key: None,
            summary_length: settings.summary_length,
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            max_response_bytes: settings.max_bytes,
            store_dir: PathBuf::from(".summarizer"),
            copy_feedback_ms: COPY_FEEDBACK_WINDOW.as_millis() as u64,
            log_file: PathBuf::from("summarizer.log"),
            log_to_stderr: false,
        }
    }
}

impl AppConfig {
    /// Reads `path` when it exists, then applies environment overrides
    /// (including those from a `.env` file).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(host) = non_empty(ENV_API_HOST) {
            self.api_host = host;
        }
        if let Some(url) = non_empty(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(dir) = non_empty(ENV_STORE_DIR) {
            self.store_dir = PathBuf::from(dir);
        }
    }

    pub fn summarize_settings(&self) -> SummarizeSettings {
        SummarizeSettings {
            base_url: self.api_url.clone(),
            api_host: self.api_host.clone(),
            api_key: self.api_key.clone(),
            summary_length: self.summary_length,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
            ..SummarizeSettings::default()
        }
    }

    pub fn copy_window(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let config = AppConfig::parse("(summary_length: 5, copy_feedback_ms: 1500)").unwrap();

        assert_eq!(config.summary_length, 5);
        assert_eq!(config.copy_window(), Duration::from_millis(1500));
        assert_eq!(config.api_host, AppConfig::default().api_host);
        assert_eq!(config.store_dir, PathBuf::from(".summarizer"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(AppConfig::parse("(summary_length: \"many\")").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = AppConfig::from_file(&temp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_KEY, "secret"),
            (ENV_API_URL, "http://localhost:9000"),
            (ENV_STORE_DIR, "  "),
        ]);
        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.store_dir, PathBuf::from(".summarizer"));

        let settings = config.summarize_settings();
        assert_eq!(settings.base_url, "http://localhost:9000");
        assert_eq!(settings.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.summary_length, 3);
    }
}
