use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::domain::{AnalysisResult, AnalysisScope};
use crate::errors::AppError;
use crate::services::ratio::asset_turnover_ratio;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(run_analysis))
}

/// POST /api/analysis
///
/// The single orchestration point: compute the ratio, await the AI advisor,
/// append a history period. Strictly one submission at a time; starting a new
/// one clears the previous result and error, and every failure path leaves
/// exactly one user-facing message behind.
#[axum::debug_handler]
async fn run_analysis(State(state): State<AppState>) -> Result<Json<AnalysisResult>, AppError> {
    {
        let mut dashboard = state.dashboard.write().await;
        if dashboard.loading {
            return Err(AppError::Busy);
        }
        dashboard.loading = true;
        dashboard.error = None;
        dashboard.result = None;
    }

    // The work runs detached: a client disconnect drops this handler future,
    // but the loading flag must still be cleared and the outcome recorded.
    let worker = tokio::spawn({
        let state = state.clone();
        async move {
            let outcome = analyze(&state).await;
            let mut dashboard = state.dashboard.write().await;
            dashboard.loading = false;
            match outcome {
                Ok(result) => {
                    dashboard.result = Some(result.clone());
                    Ok(result)
                }
                Err(err) => {
                    dashboard.error = Some(err.user_message());
                    Err(err)
                }
            }
        }
    });

    match worker.await {
        Ok(Ok(result)) => Ok(Json(result)),
        Ok(Err(err)) => Err(err),
        Err(join_err) => {
            let mut dashboard = state.dashboard.write().await;
            dashboard.loading = false;
            let err = AppError::Unexpected(anyhow::anyhow!(join_err));
            dashboard.error = Some(err.user_message());
            Err(err)
        }
    }
}

async fn analyze(state: &AppState) -> Result<AnalysisResult, AppError> {
    let submission = state.form.submission().await;

    // validation happens before any network call
    if submission.analysis_scope == AnalysisScope::Unit
        && submission.unit_name.as_deref().unwrap_or("").is_empty()
    {
        return Err(AppError::Validation(
            "Nama unit/departemen harus dipilih untuk analisis per unit.".to_string(),
        ));
    }

    let atr = asset_turnover_ratio(
        submission.net_revenue,
        submission.start_assets,
        submission.end_assets,
    )?;
    info!(
        "ATR computed for '{}': {}",
        submission.unit_identifier(),
        atr
    );

    let ai = state
        .advisor
        .optimization_suggestions(&submission, atr)
        .await?;

    let entry = state.history.record(submission.unit_identifier(), atr)?;
    info!("Analysis complete ({})", entry.name);

    Ok(AnalysisResult { atr, ai })
}
