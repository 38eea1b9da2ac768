use crate::core::RateResult;
use crate::server::AppState;
use crate::server::error::ApiError;
use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::Uri;
use tracing::debug;

/// `GET /{date}/{currency}`
pub async fn get_rate(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<RateResult>, ApiError> {
    let Path((date, currency)) = path?;
    let result = state.source.lookup(&date, &currency).await?;
    debug!(?result, "Rate resolved");
    Ok(Json(result))
}

pub async fn not_found(uri: Uri) -> ApiError {
    debug!("No route for {}", uri);
    ApiError::not_found()
}
