use std::time::Duration;

use url::Url;

use crate::error::ClientResult;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub request_timeout: Duration,
    pub ingestion_poll_interval: Duration,
    pub ingestion_poll_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            request_timeout: Duration::from_secs(60),
            ingestion_poll_interval: Duration::from_secs(3),
            ingestion_poll_attempts: 40,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Root every endpoint path is appended to, always ending in `/`.
    pub fn api_root(&self) -> ClientResult<Url> {
        let base = self.base_url.trim().trim_end_matches('/');
        let prefix = self.api_prefix.trim().trim_matches('/');
        let joined = if prefix.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{prefix}/")
        };
        Ok(Url::parse(&joined)?)
    }
}
