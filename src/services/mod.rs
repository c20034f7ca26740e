pub mod feedback;
pub mod mailer;
pub mod retry;
pub mod tmdb;

pub use mailer::Mailer;
pub use retry::RetryPolicy;
pub use tmdb::TmdbClient;
