use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error::{AppError, AppResult},
    models::{watch_later::normalize_id, MediaType, WatchLaterEntry},
    watch_later::storage::StorageBackend,
};

/// Storage key shared with the web and mobile clients
pub const STORAGE_KEY: &str = "watchLater";

/// Locally persisted watch-later list.
///
/// Every mutation is a read-modify-persist cycle under one mutex and returns
/// only after the write completed, so a subsequent `list` observes it.
#[derive(Clone)]
pub struct WatchLaterStore {
    storage: Arc<dyn StorageBackend>,
    write_lock: Arc<Mutex<()>>,
}

impl WatchLaterStore {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// All saved entries in insertion order. Missing or unreadable data is
    /// an empty list.
    pub async fn list(&self) -> Vec<WatchLaterEntry> {
        let raw = match self.storage.get_item(STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read watch-later list, treating as empty");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unparsable watch-later list, treating as empty");
            Vec::new()
        })
    }

    /// Current entries for a mutation. A failed read is an error so the
    /// following persist never overwrites data it could not see.
    async fn load(&self) -> AppResult<Vec<WatchLaterEntry>> {
        let Some(raw) = self.storage.get_item(STORAGE_KEY).await? else {
            return Ok(Vec::new());
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unparsable watch-later list, starting over");
            Vec::new()
        }))
    }

    pub async fn contains(&self, id: impl ToString, media_type: MediaType) -> bool {
        let id = normalize_id(id);
        self.list()
            .await
            .iter()
            .any(|entry| entry.matches(&id, media_type))
    }

    /// Saves the pair. Returns `false` without writing if it is already saved
    /// or the id is empty.
    pub async fn add(&self, id: impl ToString, media_type: MediaType) -> AppResult<bool> {
        let entry = WatchLaterEntry::new(id, media_type);
        if entry.id.is_empty() {
            return Ok(false);
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        if entries.iter().any(|e| e.matches(&entry.id, media_type)) {
            tracing::debug!(id = %entry.id, media_type = %media_type, "Already in watch later");
            return Ok(false);
        }

        tracing::info!(id = %entry.id, media_type = %media_type, "Added to watch later");
        entries.push(entry);
        self.persist(&entries).await?;
        Ok(true)
    }

    /// Removes the pair if present. The list is rewritten either way.
    pub async fn remove(&self, id: impl ToString, media_type: MediaType) -> AppResult<()> {
        let id = normalize_id(id);

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();
        entries.retain(|e| !e.matches(&id, media_type));

        tracing::info!(
            id = %id,
            media_type = %media_type,
            removed = before - entries.len(),
            "Removed from watch later"
        );
        self.persist(&entries).await
    }

    pub async fn clear(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.storage.remove_item(STORAGE_KEY).await?;
        tracing::info!("Cleared watch later");
        Ok(())
    }

    /// Deep-link add from `?id=..&type=..`. Missing or unknown values are
    /// ignored.
    pub async fn add_from_query(
        &self,
        id: Option<&str>,
        media_type: Option<&str>,
    ) -> AppResult<bool> {
        let (Some(id), Some(media_type)) = (id, media_type) else {
            return Ok(false);
        };

        match media_type.parse::<MediaType>() {
            Ok(media_type) => self.add(id, media_type).await,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring watch-later deep link");
                Ok(false)
            }
        }
    }

    async fn persist(&self, entries: &[WatchLaterEntry]) -> AppResult<()> {
        let json = serde_json::to_string(entries).map_err(|e| {
            AppError::Internal(format!("Watch-later serialization error: {}", e))
        })?;
        self.storage.set_item(STORAGE_KEY, &json).await
    }
}
