use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::{FeedbackRequest, FeedbackResponse},
    services::feedback,
};

/// POST /feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> AppResult<Json<FeedbackResponse>> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected feedback body");
        AppError::InvalidInput("Name, email and message are required".to_string())
    })?;

    let id = feedback::send_feedback(state.mailer.as_deref(), request).await?;

    Ok(Json(FeedbackResponse {
        message: "Feedback sent successfully!".to_string(),
        id,
    }))
}
