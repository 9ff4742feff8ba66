use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{analysis, dashboard, form, health, history};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/form", form::router())
        .nest("/api/analysis", analysis::router())
        .nest("/api/dashboard", dashboard::router())
        .nest("/api/history", history::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
