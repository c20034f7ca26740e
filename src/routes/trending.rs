use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    api::{envelope::Envelope, extract::ApiQuery, AppState},
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    time_window: Option<String>,
}

impl TrendingQuery {
    fn window(&self) -> AppResult<&'static str> {
        match self.time_window.as_deref() {
            None | Some("") | Some("day") => Ok("day"),
            Some("week") => Ok("week"),
            Some(_) => Err(AppError::InvalidInput(
                "time_window must be 'day' or 'week'".to_string(),
            )),
        }
    }
}

/// GET /trending/movies
pub async fn trending_movies(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TrendingQuery>,
) -> AppResult<Envelope<Value>> {
    let window = query.window()?;
    let results = state
        .tmdb
        .get_json(&format!("/trending/movie/{}", window), &[])
        .await?;
    Ok(Envelope::new(results))
}

/// GET /trending/tv
pub async fn trending_tv(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TrendingQuery>,
) -> AppResult<Envelope<Value>> {
    let window = query.window()?;
    let results = state
        .tmdb
        .get_json(&format!("/trending/tv/{}", window), &[])
        .await?;
    Ok(Envelope::new(results))
}
