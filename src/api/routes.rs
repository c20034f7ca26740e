use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};
use crate::routes::{self, discover, feedback, movie, people, search, trending, tv};

use super::AppState;

/// Largest accepted request body
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Creates the application router. Every route lives under `/api`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .fallback(routes::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                )),
        )
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(routes::health_check))
        .route("/search", get(search::search_get).post(search::search_post))
        .route("/feedback", axum::routing::post(feedback::submit_feedback))
        .nest("/movie", movie_routes())
        .nest("/tv", tv_routes())
        .nest("/people", people_routes())
        .nest("/discover", discover_routes())
        .nest("/trending", trending_routes())
}

fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/get/:id", get(movie::get_movie))
        .route("/credits/:id", get(movie::get_credits))
        .route("/recommendations/:id", get(movie::get_recommendations))
        .route("/videos/:id", get(movie::get_videos))
        .route("/latest", get(movie::get_latest))
}

fn tv_routes() -> Router<AppState> {
    Router::new()
        .route("/get/:id", get(tv::get_tv))
        .route("/season/:series_id/:season_num", get(tv::get_season))
        .route(
            "/episode/:series_id/:season_num/:episode_num",
            get(tv::get_episode),
        )
        .route(
            "/credits/:series_id/:season_num/:episode_num",
            get(tv::get_episode_credits),
        )
        .route("/recommendations/:id", get(tv::get_recommendations))
        .route("/videos/:id", get(tv::get_videos))
        .route("/latest", get(tv::get_latest))
}

fn people_routes() -> Router<AppState> {
    Router::new()
        .route("/get/:id", get(people::get_person))
        .route("/credits/:id", get(people::get_credits))
}

fn discover_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(discover::discover_movies))
        .route("/tv", get(discover::discover_tv))
        .route("/genres", get(discover::get_genres))
}

fn trending_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(trending::trending_movies))
        .route("/tv", get(trending::trending_tv))
}

/// CORS for the configured front-end origin, or any origin without
/// credentials when none is configured
pub fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let layer = match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_str(origin)?))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        None => CorsLayer::permissive(),
    };
    Ok(layer)
}
