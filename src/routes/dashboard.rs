use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::services::presentation::{dashboard_view, DashboardView};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// GET /api/dashboard
///
/// View model for the results pane: loading flag, current error or result,
/// gauge reading and the historical trend series.
async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard_view(&dashboard, state.history.entries()))
}
