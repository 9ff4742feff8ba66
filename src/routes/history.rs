use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::domain::HistoricalEntry;
use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_history).delete(clear_history))
}

/// GET /api/history
async fn get_history(State(state): State<AppState>) -> Json<Vec<HistoricalEntry>> {
    Json(state.history.entries())
}

/// DELETE /api/history
///
/// Wholesale reset: the stored series goes back to empty and the currently
/// displayed result is dropped with it.
#[axum::debug_handler]
async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    info!("DELETE /api/history - clearing ATR history");
    state.history.clear()?;
    let mut dashboard = state.dashboard.write().await;
    dashboard.result = None;
    Ok(StatusCode::NO_CONTENT)
}
