use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    api::{envelope::Envelope, extract::ApiQuery, params, AppState},
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
    page: Option<String>,
    adult: Option<String>,
}

/// POST body as sent by the web client
#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    query: Option<String>,
    page: Option<Value>,
    #[serde(rename = "isAdult")]
    is_adult: Option<Value>,
}

fn is_true(flag: Option<&Value>) -> bool {
    match flag {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

fn page_from_value(page: Option<&Value>) -> u32 {
    match page {
        Some(Value::Number(n)) => params::page(Some(&n.to_string())),
        Some(Value::String(s)) => params::page(Some(s)),
        _ => 1,
    }
}

async fn run_search(
    state: &AppState,
    query: Option<String>,
    page: u32,
    include_adult: bool,
) -> AppResult<Envelope<Value>> {
    let query = query.map(|q| q.trim().to_string()).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Query is required".to_string()));
    }
    if query.chars().count() < 2 {
        return Err(AppError::InvalidInput(
            "Query must be at least 2 characters".to_string(),
        ));
    }

    tracing::debug!(query = %query, page, include_adult, "Multi search");

    let results = state
        .tmdb
        .get_json(
            "/search/multi",
            &[
                ("query", query),
                ("page", page.to_string()),
                ("include_adult", include_adult.to_string()),
            ],
        )
        .await?;

    Ok(Envelope::new(results))
}

/// GET /search?query=..&page=..&adult=..
pub async fn search_get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> AppResult<Envelope<Value>> {
    let page = params::page(query.page.as_deref());
    let include_adult = query.adult.as_deref() == Some("true");
    run_search(&state, query.query, page, include_adult).await
}

/// POST /search with `{ query, page, isAdult }`
pub async fn search_post(
    State(state): State<AppState>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> AppResult<Envelope<Value>> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => SearchBody::default(),
        Err(rejection) => return Err(AppError::InvalidInput(rejection.body_text())),
    };

    let page = page_from_value(body.page.as_ref());
    let include_adult = is_true(body.is_adult.as_ref());
    run_search(&state, body.query, page, include_adult).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_adult_flag_accepts_bool_and_string() {
        assert!(is_true(Some(&json!(true))));
        assert!(is_true(Some(&json!("true"))));
        assert!(!is_true(Some(&json!("yes"))));
        assert!(!is_true(Some(&json!(false))));
        assert!(!is_true(None));
    }

    #[test]
    fn test_page_from_body() {
        assert_eq!(page_from_value(Some(&json!(3))), 3);
        assert_eq!(page_from_value(Some(&json!("4"))), 4);
        assert_eq!(page_from_value(Some(&json!(0))), 1);
        assert_eq!(page_from_value(Some(&json!(null))), 1);
        assert_eq!(page_from_value(None), 1);
    }
}
