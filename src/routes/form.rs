use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::FormState;
use crate::errors::AppError;
use crate::services::form_service::{FormUpdate, MonetaryField};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_form).put(update_form))
        .route("/init", post(init_form))
        .route("/toggle-sign", post(toggle_sign))
        .route("/share-link", get(share_link))
}

/// GET /api/form
async fn get_form(State(state): State<AppState>) -> Json<FormState> {
    Json(state.form.current().await)
}

/// POST /api/form/init?netRevenue=...&analysisScope=...
/// Applies shareable-link parameters once per session; a repeat call returns
/// the current state untouched.
#[axum::debug_handler]
async fn init_form(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<FormState>, AppError> {
    info!("POST /api/form/init ({} raw parameters)", params.len());
    let form = state.form.apply_query_params(&params).await?;
    Ok(Json(form))
}

/// PUT /api/form
#[axum::debug_handler]
async fn update_form(
    State(state): State<AppState>,
    Json(update): Json<FormUpdate>,
) -> Result<Json<FormState>, AppError> {
    let form = state.form.update(update).await?;
    Ok(Json(form))
}

#[derive(Debug, Deserialize)]
struct ToggleSignRequest {
    field: MonetaryField,
}

/// POST /api/form/toggle-sign
#[axum::debug_handler]
async fn toggle_sign(
    State(state): State<AppState>,
    Json(request): Json<ToggleSignRequest>,
) -> Result<Json<FormState>, AppError> {
    let form = state.form.toggle_sign(request.field).await?;
    Ok(Json(form))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareLinkResponse {
    query_string: String,
}

/// GET /api/form/share-link
async fn share_link(State(state): State<AppState>) -> Json<ShareLinkResponse> {
    Json(ShareLinkResponse {
        query_string: state.form.share_link().await,
    })
}
