use axum::extract::State;
use serde_json::Value;

use crate::{
    api::{envelope::Envelope, extract::ApiPath, params, AppState},
    error::AppResult,
};

async fn upstream(state: &AppState, path: String) -> AppResult<Envelope<Value>> {
    let details = state.tmdb.get_json(&path, &[]).await?;
    Ok(Envelope::new(details))
}

/// GET /tv/get/:id
pub async fn get_tv(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<Value>> {
    let id = params::numeric_id(&id)?;
    upstream(&state, format!("/tv/{}", id)).await
}

/// GET /tv/season/:series_id/:season_num
pub async fn get_season(
    State(state): State<AppState>,
    ApiPath((series_id, season_num)): ApiPath<(String, String)>,
) -> AppResult<Envelope<Value>> {
    let (series, season) = params::season_params(&series_id, &season_num)?;
    upstream(&state, format!("/tv/{}/season/{}", series, season)).await
}

/// GET /tv/episode/:series_id/:season_num/:episode_num
pub async fn get_episode(
    State(state): State<AppState>,
    ApiPath((series_id, season_num, episode_num)): ApiPath<(String, String, String)>,
) -> AppResult<Envelope<Value>> {
    let (series, season, episode) =
        params::episode_params(&series_id, &season_num, &episode_num)?;
    upstream(
        &state,
        format!("/tv/{}/season/{}/episode/{}", series, season, episode),
    )
    .await
}

/// GET /tv/credits/:series_id/:season_num/:episode_num
pub async fn get_episode_credits(
    State(state): State<AppState>,
    ApiPath((series_id, season_num, episode_num)): ApiPath<(String, String, String)>,
) -> AppResult<Envelope<Value>> {
    let (series, season, episode) =
        params::episode_params(&series_id, &season_num, &episode_num)?;
    upstream(
        &state,
        format!("/tv/{}/season/{}/episode/{}/credits", series, season, episode),
    )
    .await
}

/// GET /tv/recommendations/:id
pub async fn get_recommendations(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<Value>> {
    let id = params::numeric_id(&id)?;
    upstream(&state, format!("/tv/{}/recommendations", id)).await
}

/// GET /tv/videos/:id
pub async fn get_videos(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<Value>> {
    let id = params::numeric_id(&id)?;
    upstream(&state, format!("/tv/{}/videos", id)).await
}

/// GET /tv/latest
pub async fn get_latest(State(state): State<AppState>) -> AppResult<Envelope<Value>> {
    upstream(&state, "/tv/latest".to_string()).await
}
