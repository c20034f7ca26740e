use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    api::{envelope::Envelope, extract::ApiQuery, params, AppState},
    error::{AppError, AppResult},
};

const DEFAULT_SORT: &str = "popularity.desc";

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    genre: Option<String>,
    page: Option<String>,
    sort_by: Option<String>,
    year: Option<String>,
}

impl DiscoverQuery {
    /// Upstream params; `year_param` differs between movies and tv
    fn upstream_params(
        &self,
        year_param: &'static str,
    ) -> AppResult<Vec<(&'static str, String)>> {
        let sort_by = self
            .sort_by
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SORT);

        let mut upstream = vec![
            ("page", params::page(self.page.as_deref()).to_string()),
            ("sort_by", sort_by.to_string()),
            ("include_adult", "false".to_string()),
        ];

        if let Some(genre) = self.genre.as_deref().filter(|g| !g.is_empty()) {
            upstream.push(("with_genres", genre.to_string()));
        }

        if let Some(year) = self.year.as_deref().filter(|y| !y.is_empty()) {
            if !year.bytes().all(|b| b.is_ascii_digit()) {
                return Err(AppError::InvalidInput("Year must be numeric".to_string()));
            }
            upstream.push((year_param, year.to_string()));
        }

        Ok(upstream)
    }
}

/// GET /discover/movies
pub async fn discover_movies(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DiscoverQuery>,
) -> AppResult<Envelope<Value>> {
    let upstream = query.upstream_params("primary_release_year")?;
    let results = state.tmdb.get_json("/discover/movie", &upstream).await?;
    Ok(Envelope::new(results))
}

/// GET /discover/tv
pub async fn discover_tv(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DiscoverQuery>,
) -> AppResult<Envelope<Value>> {
    let upstream = query.upstream_params("first_air_date_year")?;
    let results = state.tmdb.get_json("/discover/tv", &upstream).await?;
    Ok(Envelope::new(results))
}

/// GET /discover/genres
///
/// Movie and tv genre lists, fetched concurrently
pub async fn get_genres(State(state): State<AppState>) -> AppResult<Envelope<Value>> {
    let (movie, tv) = tokio::try_join!(
        state.tmdb.get_json("/genre/movie/list", &[]),
        state.tmdb.get_json("/genre/tv/list", &[]),
    )?;

    let genres = |body: &Value| body.get("genres").cloned().unwrap_or_else(|| json!([]));

    Ok(Envelope::new(json!({
        "movie": genres(&movie),
        "tv": genres(&tv),
    })))
}
