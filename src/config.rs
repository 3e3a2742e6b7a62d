use std::env;

/// Default ZENTRA Cloud API root (tokenized v1 endpoints).
pub const DEFAULT_BASE_URL: &str = "https://zentracloud.com/api/v1";

/// Default label for the per-reading signal-quality column. The vendor has
/// renamed this field across API revisions, so it stays configurable.
pub const DEFAULT_QUALITY_LABEL: &str = "rssi";

#[derive(Debug, Clone)]
pub struct Config {
    /// API root, no trailing slash.
    pub base_url: String,

    /// Optional credentials for token acquisition.
    pub username: Option<String>,
    pub password: Option<String>,

    /// Optional pre-issued access token.
    pub token: Option<String>,

    /// Blocking transport timeout.
    pub timeout_seconds: u64,

    /// Output label for the signal-quality column.
    pub quality_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: None,
            password: None,
            token: None,
            timeout_seconds: 60,
            quality_label: DEFAULT_QUALITY_LABEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (reading `.env` first).
    /// Every variable is optional; defaults match the public ZENTRA service.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            base_url: env::var("ZENTRA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            username: env::var("ZENTRA_USERNAME").ok(),
            password: env::var("ZENTRA_PASSWORD").ok(),
            token: env::var("ZENTRA_TOKEN").ok(),
            timeout_seconds: env::var("ZENTRA_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("ZENTRA_TIMEOUT_SECONDS"))?,
            quality_label: env::var("ZENTRA_QUALITY_LABEL")
                .unwrap_or_else(|_| DEFAULT_QUALITY_LABEL.to_string()),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_quality_label(mut self, label: impl Into<String>) -> Self {
        self.quality_label = label.into();
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Unparseable environment variable: {0}")]
    Invalid(&'static str),
}
