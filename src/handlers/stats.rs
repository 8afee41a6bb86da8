use axum::{Json, extract::State, http::Method};
use tracing::warn;

use super::AppState;
use crate::error::AppError;
use crate::stats::{SurveyStats, collect_stats};

/// `GET /api/get-stats`: aggregate counts over the survey table.
#[tracing::instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    method: Method,
) -> Result<Json<SurveyStats>, AppError> {
    if method != Method::GET {
        warn!("Rejected stats request");
        return Err(AppError::method_not_allowed(method, Method::GET));
    }

    Ok(Json(collect_stats(state.store.as_ref()).await?))
}
