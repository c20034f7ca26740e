pub mod feedback;
pub mod media;
pub mod watch_later;

pub use feedback::{FeedbackRequest, FeedbackResponse};
pub use media::MediaType;
pub use watch_later::{EnrichedWatchLaterEntry, Reconciliation, WatchLaterEntry};
