use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{EnrichedWatchLaterEntry, MediaType, Reconciliation},
    watch_later::store::WatchLaterStore,
};

/// Shown when a non-empty list could not be enriched at all
pub const RECONCILE_ERROR_MESSAGE: &str = "Failed to fetch saved items.";

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of live details for a saved entry
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    /// Detail object for `id`, unwrapped from the proxy envelope
    async fn fetch_details(&self, media_type: MediaType, id: &str) -> AppResult<Value>;
}

/// Rebuilds the displayable watch-later list from the store on every call
pub struct Reconciler {
    source: Arc<dyn MetadataSource>,
    fetch_timeout: Duration,
}

impl Reconciler {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self {
            source,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Fetches every saved entry concurrently and keeps the ones that resolved.
    ///
    /// Individual failures land in `failed`; the entries stay in the store.
    /// This never returns an error: a total failure is reported through
    /// `Reconciliation::error`.
    pub async fn reconcile(&self, store: &WatchLaterStore) -> Reconciliation {
        let entries = store.list().await;
        if entries.is_empty() {
            return Reconciliation::empty();
        }

        tracing::info!(entry_count = entries.len(), "Reconciling watch later");

        let mut tasks = Vec::with_capacity(entries.len());
        for entry in &entries {
            let source = Arc::clone(&self.source);
            let fetch_timeout = self.fetch_timeout;
            let media_type = entry.media_type;
            let id = entry.id.clone();

            tasks.push(tokio::spawn(async move {
                match tokio::time::timeout(fetch_timeout, source.fetch_details(media_type, &id))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(AppError::Timeout),
                }
            }));
        }

        let mut items = Vec::new();
        let mut failed = Vec::new();

        // Joined in stored order, so completion order does not matter
        for (entry, task) in entries.into_iter().zip(tasks) {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(AppError::Internal(e.to_string())),
            };

            match result {
                Ok(details) => items.push(EnrichedWatchLaterEntry::new(entry, details)),
                Err(e) => {
                    tracing::warn!(
                        id = %entry.id,
                        media_type = %entry.media_type,
                        error = %e,
                        "Watch-later fetch failed"
                    );
                    failed.push(entry);
                }
            }
        }

        if !failed.is_empty() {
            tracing::warn!(
                success_count = items.len(),
                error_count = failed.len(),
                "Partial watch-later reconciliation failure"
            );
        }

        let error = if items.is_empty() {
            Some(RECONCILE_ERROR_MESSAGE.to_string())
        } else {
            None
        };

        Reconciliation {
            items,
            failed,
            error,
            reconciled_at: Utc::now(),
        }
    }
}
