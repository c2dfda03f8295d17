use loe_editor::DEFAULT_LOE_TYPE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "loe.config.json";

/// LoE assistant configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Backend base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Assistant type sent with every request
    #[serde(default = "default_loe_type")]
    pub loe_type: String,

    /// Where the session is kept between runs
    #[serde(default = "default_session_dir")]
    pub session_dir: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Answer from canned data instead of the backend
    #[serde(default)]
    pub mock: bool,
}

fn default_api_base() -> String {
    "http://localhost:5050".to_string()
}

fn default_loe_type() -> String {
    DEFAULT_LOE_TYPE.to_string()
}

fn default_session_dir() -> String {
    ".loe".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Load config from a directory, then apply environment overrides
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            // Return default config if none exists
            Config::default()
        };

        Ok(config.with_overrides(|name| std::env::var(name).ok()))
    }

    /// `LOE_API_BASE` replaces the base URL; `LOE_USE_MOCK=1` turns on the mock
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(api_base) = var("LOE_API_BASE").filter(|v| !v.trim().is_empty()) {
            self.api_base = api_base.trim().to_string();
        }
        if var("LOE_USE_MOCK").as_deref() == Some("1") {
            self.mock = true;
        }
        self
    }

    /// Get absolute path to the session directory
    pub fn get_session_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.session_dir)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            loe_type: default_loe_type(),
            session_dir: default_session_dir(),
            timeout_secs: default_timeout_secs(),
            mock: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "apiBase": "https://loe.example.com",
            "loeType": "wifi_survey",
            "timeoutSecs": 30,
            "mock": true
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_base, "https://loe.example.com");
        assert_eq!(config.loe_type, "wifi_survey");
        assert_eq!(config.session_dir, ".loe");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.mock);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base, "http://localhost:5050");
        assert_eq!(config.loe_type, "rack_stack");
        assert_eq!(config.timeout_secs, 120);
        assert!(!config.mock);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_overrides(|name| match name {
            "LOE_API_BASE" => Some(" http://10.0.0.5:5050 ".to_string()),
            "LOE_USE_MOCK" => Some("1".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base, "http://10.0.0.5:5050");
        assert!(config.mock);

        let untouched = Config::default().with_overrides(|name| match name {
            "LOE_USE_MOCK" => Some("true".to_string()),
            _ => None,
        });
        assert_eq!(untouched, Config::default());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = Config::load(&temp.path().display().to_string()).unwrap();
        assert_eq!(config.loe_type, "rack_stack");
    }
}
