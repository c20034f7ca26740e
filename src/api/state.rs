use std::sync::Arc;

use crate::services::{Mailer, TmdbClient};

/// Shared application state, built once at startup and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<TmdbClient>,
    pub mailer: Option<Arc<Mailer>>,
}

impl AppState {
    pub fn new(tmdb: TmdbClient) -> Self {
        Self {
            tmdb: Arc::new(tmdb),
            mailer: None,
        }
    }

    pub fn with_mailer(mut self, mailer: Mailer) -> Self {
        self.mailer = Some(Arc::new(mailer));
        self
    }
}
