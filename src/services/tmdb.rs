//! TMDB API client
//!
//! Every proxy controller goes through [`TmdbClient::get_json`], which adds the
//! bearer token, applies the request timeout and runs the call under the
//! injected [`RetryPolicy`]. Non-success responses are turned into
//! [`AppError::Upstream`] with the upstream status and `status_message`.
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult, UPSTREAM_ERROR_MESSAGE},
    services::retry::RetryPolicy,
};

/// Error body returned by TMDB
#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    #[serde(default)]
    status_message: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_url: String,
    retry_policy: RetryPolicy,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl TmdbClient {
    /// Creates a client with the bearer token installed as a default header
    pub fn new(
        api_url: impl Into<String>,
        api_key: &str,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        if !api_key.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| AppError::Internal(format!("Invalid TMDB API key: {}", e)))?;
            auth.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth);
        }

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            retry_policy,
            cache: None,
            cache_ttl: 0,
        })
    }

    /// Enables read-through caching of successful responses
    pub fn with_cache(mut self, cache: Cache, ttl_secs: u64) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl_secs;
        self
    }

    /// GET `{api_url}{path}` and return the decoded JSON body
    pub async fn get_json(&self, path: &str, params: &[(&str, String)]) -> AppResult<Value> {
        let cache_key = CacheKey::upstream(path, params);

        cached!(self.cache.as_ref(), cache_key, self.cache_ttl, async {
            self.retry_policy
                .execute(path, || self.fetch(path, params))
                .await
        })
    }

    async fn fetch(&self, path: &str, params: &[(&str, String)]) -> AppResult<Value> {
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!(url = %url, "TMDB request");

        let response = self.http_client.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TmdbErrorBody>(&body)
                .ok()
                .and_then(|b| b.status_message)
                .unwrap_or_else(|| UPSTREAM_ERROR_MESSAGE.to_string());

            tracing::warn!(
                path = %path,
                status = %status,
                message = %message,
                "TMDB request failed"
            );
            return Err(AppError::Upstream { status, message });
        }

        let body: Value = response.json().await?;
        Ok(body)
    }
}
