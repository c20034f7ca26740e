use axum::extract::State;
use serde_json::Value;

use crate::{
    api::{envelope::Envelope, extract::ApiPath, params, AppState},
    error::AppResult,
};

/// GET /people/get/:id
pub async fn get_person(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<Value>> {
    let id = params::numeric_id(&id)?;
    let person = state.tmdb.get_json(&format!("/person/{}", id), &[]).await?;
    Ok(Envelope::new(person))
}

/// GET /people/credits/:id
///
/// Movie and tv credits combined
pub async fn get_credits(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<Value>> {
    let id = params::numeric_id(&id)?;
    let credits = state
        .tmdb
        .get_json(&format!("/person/{}/combined_credits", id), &[])
        .await?;
    Ok(Envelope::new(credits))
}
