//! Client-side watch-later list.
//!
//! The list lives only in local storage ([`WatchLaterStore`]); the proxy never
//! sees it. [`Reconciler`] turns the saved ids into displayable entries by
//! fetching each one through a [`MetadataSource`], normally [`ProxyClient`].

pub mod proxy_client;
pub mod reconcile;
pub mod storage;
pub mod store;

pub use proxy_client::ProxyClient;
pub use reconcile::{MetadataSource, Reconciler, RECONCILE_ERROR_MESSAGE};
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
pub use store::{WatchLaterStore, STORAGE_KEY};
