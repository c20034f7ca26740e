use serde::Deserialize;
use std::time::Duration;

use crate::services::retry::RetryPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB read access token, sent as a bearer token
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origin. When unset, any origin is allowed without credentials.
    #[serde(default)]
    pub origin_domain: Option<String>,

    /// Timeout applied to every upstream request
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Retries after the first attempt, transient errors only
    #[serde(default = "default_upstream_max_retries")]
    pub upstream_max_retries: u32,

    #[serde(default = "default_upstream_retry_delay_ms")]
    pub upstream_retry_delay_ms: u64,

    /// Redis connection URL. Upstream responses are cached only when set.
    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Resend API key. Feedback delivery is disabled when unset.
    #[serde(default)]
    pub resend_api_key: Option<String>,

    #[serde(default = "default_resend_api_url")]
    pub resend_api_url: String,

    #[serde(default = "default_feedback_from")]
    pub feedback_from: String,

    #[serde(default = "default_feedback_to")]
    pub feedback_to: String,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upstream_timeout_secs() -> u64 {
    15
}

fn default_upstream_max_retries() -> u32 {
    1
}

fn default_upstream_retry_delay_ms() -> u64 {
    500
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_resend_api_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_feedback_from() -> String {
    "Vidoza Feedback <onboarding@resend.dev>".to_string()
}

fn default_feedback_to() -> String {
    "feedback@vidoza.app".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Retry policy for the upstream client
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.upstream_max_retries,
            base_delay: Duration::from_millis(self.upstream_retry_delay_ms),
            ..RetryPolicy::default()
        }
    }
}
