use std::time::Duration;

use reqwest::{Client as HttpClient, Url};
use serde_json::Value;

use crate::{
    api::envelope::{Envelope, ErrorBody},
    error::{AppError, AppResult, UPSTREAM_ERROR_MESSAGE},
    models::MediaType,
    watch_later::reconcile::MetadataSource,
};

/// Client for the proxy's `/{media_type}/get/{id}` endpoints, as used by the
/// front-ends
#[derive(Clone)]
pub struct ProxyClient {
    http_client: HttpClient,
    base_url: Url,
}

impl ProxyClient {
    /// `base_url` includes the `/api` prefix
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let base_url = base_url.into();
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| AppError::Internal(format!("Invalid proxy URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Internal(format!("Invalid proxy URL {}", base_url)));
        }

        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// `{base}/{media_type}/get/{id}` with `id` percent-encoded as one segment
    fn details_url(&self, media_type: MediaType, id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([media_type.as_str(), "get", id]);
        }
        url
    }
}

#[async_trait::async_trait]
impl MetadataSource for ProxyClient {
    async fn fetch_details(&self, media_type: MediaType, id: &str) -> AppResult<Value> {
        let url = self.details_url(media_type, id);

        let response = self.http_client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| UPSTREAM_ERROR_MESSAGE.to_string());
            return Err(AppError::Upstream { status, message });
        }

        let envelope: Envelope<Value> = response.json().await?;
        Ok(envelope.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch_later::{storage::MemoryStorage, Reconciler, WatchLaterStore};
    use axum::http::StatusCode;
    use mockito::Server;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fetch_details_unwraps_envelope() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/tv/get/1399")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "results": { "id": 1399, "name": "Game of Thrones" } }).to_string(),
            )
            .create_async()
            .await;

        let client =
            ProxyClient::new(format!("{}/api/", server.url()), Duration::from_secs(5)).unwrap();
        let details = client.fetch_details(MediaType::Tv, "1399").await.unwrap();

        assert_eq!(details["name"], "Game of Thrones");
    }

    #[tokio::test]
    async fn test_error_body_message_is_kept() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/movie/get/999999999")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "message": "The resource you requested could not be found." }).to_string(),
            )
            .create_async()
            .await;

        let client =
            ProxyClient::new(format!("{}/api", server.url()), Duration::from_secs(5)).unwrap();
        let err = client
            .fetch_details(MediaType::Movie, "999999999")
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.public_message(),
            "The resource you requested could not be found."
        );
    }

    #[tokio::test]
    async fn test_reconcile_through_proxy_tolerates_failures() {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("GET", "/api/movie/get/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "results": { "id": 1, "title": "One" } }).to_string())
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/api/tv/get/2")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(json!({ "message": "Not found" }).to_string())
            .create_async()
            .await;

        let store = WatchLaterStore::new(Arc::new(MemoryStorage::new()));
        store.add("1", MediaType::Movie).await.unwrap();
        store.add("2", MediaType::Tv).await.unwrap();

        let client =
            ProxyClient::new(format!("{}/api", server.url()), Duration::from_secs(5)).unwrap();
        let result = Reconciler::new(Arc::new(client)).reconcile(&store).await;

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].id, "1");
        assert_eq!(result.items[0].display_title(), Some("One"));
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_total_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = WatchLaterStore::new(Arc::new(MemoryStorage::new()));
        store.add("603", MediaType::Movie).await.unwrap();

        let client =
            ProxyClient::new(format!("http://{}/api", addr), Duration::from_secs(2)).unwrap();
        let result = Reconciler::new(Arc::new(client)).reconcile(&store).await;

        assert!(result.items.is_empty());
        assert_eq!(result.error.as_deref(), Some("Failed to fetch saved items."));
        assert_eq!(store.list().await.len(), 1);
    }

    #[test]
    fn test_id_is_a_single_encoded_segment() {
        let client =
            ProxyClient::new("http://localhost:3000/api/", Duration::from_secs(5)).unwrap();

        assert_eq!(
            client.details_url(MediaType::Movie, "603").as_str(),
            "http://localhost:3000/api/movie/get/603"
        );
        assert_eq!(
            client.details_url(MediaType::Tv, "1/../../health?x=1").as_str(),
            "http://localhost:3000/api/tv/get/1%2F..%2F..%2Fhealth%3Fx=1"
        );
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(ProxyClient::new("not a url", Duration::from_secs(5)).is_err());
        assert!(ProxyClient::new("mailto:someone@example.com", Duration::from_secs(5)).is_err());
    }
}
