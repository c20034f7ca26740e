use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::MediaType;

/// A saved `(id, media_type)` pair. The pair is the identity; entries are
/// never edited, only added and removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WatchLaterEntry {
    pub id: String,
    pub media_type: MediaType,
}

impl WatchLaterEntry {
    pub fn new(id: impl ToString, media_type: MediaType) -> Self {
        Self {
            id: normalize_id(id),
            media_type,
        }
    }

    pub fn matches(&self, id: &str, media_type: MediaType) -> bool {
        self.id == id && self.media_type == media_type
    }
}

/// Ids arrive as numbers or strings; they are always stored as trimmed strings.
pub fn normalize_id(id: impl ToString) -> String {
    id.to_string().trim().to_string()
}

/// A saved entry merged with the live upstream details.
///
/// The stored `id` and `media_type` win over payload fields of the same name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedWatchLaterEntry {
    pub id: String,
    pub media_type: MediaType,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl EnrichedWatchLaterEntry {
    pub fn new(entry: WatchLaterEntry, details: Value) -> Self {
        let mut details = match details {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        details.remove("id");
        details.remove("media_type");

        Self {
            id: entry.id,
            media_type: entry.media_type,
            details,
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }

    /// `title` for movies, `name` for tv
    pub fn display_title(&self) -> Option<&str> {
        self.str_field("title").or_else(|| self.str_field("name"))
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.str_field("poster_path")
    }

    pub fn vote_average(&self) -> Option<f64> {
        self.details.get("vote_average").and_then(Value::as_f64)
    }

    /// `release_date` for movies, `first_air_date` for tv
    pub fn release_date(&self) -> Option<&str> {
        self.str_field("release_date")
            .or_else(|| self.str_field("first_air_date"))
    }
}

/// Result of re-fetching every saved entry
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    /// Successful enrichments, in stored order
    pub items: Vec<EnrichedWatchLaterEntry>,
    /// Entries whose fetch failed. They stay in the store.
    pub failed: Vec<WatchLaterEntry>,
    /// User-visible message, set only when every fetch failed
    pub error: Option<String>,
    pub reconciled_at: DateTime<Utc>,
}

impl Reconciliation {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            failed: Vec::new(),
            error: None,
            reconciled_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
