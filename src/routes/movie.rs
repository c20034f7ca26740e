use axum::extract::State;
use serde_json::Value;

use crate::{
    api::{envelope::Envelope, extract::ApiPath, params, AppState},
    error::AppResult,
};

async fn movie_resource(
    state: &AppState,
    raw_id: &str,
    suffix: &str,
) -> AppResult<Envelope<Value>> {
    let id = params::numeric_id(raw_id)?;
    let details = state
        .tmdb
        .get_json(&format!("/movie/{}{}", id, suffix), &[])
        .await?;
    Ok(Envelope::new(details))
}

/// GET /movie/get/:id
pub async fn get_movie(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<Value>> {
    movie_resource(&state, &id, "").await
}

/// GET /movie/credits/:id
pub async fn get_credits(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<Value>> {
    movie_resource(&state, &id, "/credits").await
}

/// GET /movie/recommendations/:id
pub async fn get_recommendations(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<Value>> {
    movie_resource(&state, &id, "/recommendations").await
}

/// GET /movie/videos/:id
pub async fn get_videos(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<Value>> {
    movie_resource(&state, &id, "/videos").await
}

/// GET /movie/latest
pub async fn get_latest(State(state): State<AppState>) -> AppResult<Envelope<Value>> {
    let latest = state.tmdb.get_json("/movie/latest", &[]).await?;
    Ok(Envelope::new(latest))
}
