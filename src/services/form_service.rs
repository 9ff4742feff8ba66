use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{
    AiPersona, AnalysisScope, BpjsStatus, FormState, HospitalType, Submission, DEPARTMENTS,
    SPECIALTY_HOSPITALS,
};
use crate::errors::AppError;
use crate::store::kv::FileStore;
use crate::store::FORM_STATE_KEY;
use crate::utils;

/// Shareable-link parameter names this service recognizes.
const RECOGNIZED_PARAMS: &[&str] = &[
    "netRevenue",
    "startAssets",
    "endAssets",
    "analysisScope",
    "bpjsStatus",
    "hospitalType",
    "unitName",
    "hospitalSpecialty",
    "aiPersona",
];

/// Partial form update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormUpdate {
    pub analysis_scope: Option<AnalysisScope>,
    pub bpjs_status: Option<BpjsStatus>,
    pub hospital_type: Option<HospitalType>,
    pub hospital_specialty: Option<String>,
    pub unit_name: Option<String>,
    pub net_revenue: Option<String>,
    pub start_assets: Option<String>,
    pub end_assets: Option<String>,
    pub ai_persona: Option<AiPersona>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonetaryField {
    NetRevenue,
    StartAssets,
    EndAssets,
}

/// Owns the editable form state. Every mutation writes through to the
/// persistent store; shareable-link parameters are applied at most once per
/// process session.
pub struct FormService {
    store: Arc<FileStore>,
    state: RwLock<FormState>,
    params_applied: AtomicBool,
}

impl FormService {
    pub fn new(store: Arc<FileStore>) -> Self {
        let state = store.get(FORM_STATE_KEY, FormState::default());
        Self {
            store,
            state: RwLock::new(state),
            params_applied: AtomicBool::new(false),
        }
    }

    pub async fn current(&self) -> FormState {
        self.state.read().await.clone()
    }

    /// One-shot application of shareable-link parameters. The first call in a
    /// session wins: recognized parameters override persisted fields, invalid
    /// values are ignored, and a link with no recognized parameter resets the
    /// form to its defaults. Later calls are no-ops.
    pub async fn apply_query_params(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<FormState, AppError> {
        if self.params_applied.swap(true, Ordering::SeqCst) {
            info!("Query parameters already applied this session; ignoring");
            return Ok(self.current().await);
        }

        let mut state = self.state.write().await;

        let has_any = RECOGNIZED_PARAMS.iter().any(|k| params.contains_key(*k));
        if !has_any {
            *state = FormState::default();
        } else {
            if let Some(v) = params.get("netRevenue").and_then(|v| utils::parse_loose(v)) {
                state.net_revenue = utils::format_with_dots(v);
            }
            if let Some(v) = params.get("startAssets").and_then(|v| utils::parse_loose(v)) {
                state.start_assets = utils::format_with_dots(v);
            }
            if let Some(v) = params.get("endAssets").and_then(|v| utils::parse_loose(v)) {
                state.end_assets = utils::format_with_dots(v);
            }
            if let Some(v) = params.get("analysisScope").and_then(|v| AnalysisScope::parse(v)) {
                state.analysis_scope = v;
            }
            if let Some(v) = params.get("bpjsStatus").and_then(|v| BpjsStatus::parse(v)) {
                state.bpjs_status = v;
            }
            if let Some(v) = params.get("hospitalType").and_then(|v| HospitalType::parse(v)) {
                state.hospital_type = v;
            }
            if let Some(v) = params
                .get("unitName")
                .filter(|v| DEPARTMENTS.contains(&v.as_str()))
            {
                state.unit_name = v.clone();
            }
            if let Some(v) = params
                .get("hospitalSpecialty")
                .filter(|v| SPECIALTY_HOSPITALS.contains(&v.as_str()))
            {
                state.hospital_specialty = v.clone();
            }
            if let Some(v) = params.get("aiPersona").and_then(|v| AiPersona::parse(v)) {
                state.ai_persona = v;
            }
            info!("Applied shareable-link parameters to form state");
        }

        self.store.set(FORM_STATE_KEY, &*state)?;
        Ok(state.clone())
    }

    /// Apply a field edit. Monetary fields are re-grouped as the user types;
    /// switching the hospital type to `umum` forces the specialty back to its
    /// default, so an explicit specialty in the same update loses.
    pub async fn update(&self, update: FormUpdate) -> Result<FormState, AppError> {
        let mut state = self.state.write().await;

        if let Some(v) = update.analysis_scope {
            state.analysis_scope = v;
        }
        if let Some(v) = update.bpjs_status {
            state.bpjs_status = v;
        }
        if let Some(v) = update.ai_persona {
            state.ai_persona = v;
        }
        if let Some(v) = update.unit_name {
            state.unit_name = v;
        }
        if let Some(v) = update.hospital_specialty {
            state.hospital_specialty = v;
        }
        if let Some(v) = update.net_revenue {
            state.net_revenue = utils::group_digits(&v);
        }
        if let Some(v) = update.start_assets {
            state.start_assets = utils::group_digits(&v);
        }
        if let Some(v) = update.end_assets {
            state.end_assets = utils::group_digits(&v);
        }
        if let Some(v) = update.hospital_type {
            state.hospital_type = v;
            if v == HospitalType::Umum {
                state.hospital_specialty = SPECIALTY_HOSPITALS[0].to_string();
            }
        }

        self.store.set(FORM_STATE_KEY, &*state)?;
        Ok(state.clone())
    }

    /// Prefix or strip a leading `-` on one monetary field without touching
    /// the digits. An empty field is left unchanged.
    pub async fn toggle_sign(&self, field: MonetaryField) -> Result<FormState, AppError> {
        let mut state = self.state.write().await;

        let value = match field {
            MonetaryField::NetRevenue => &mut state.net_revenue,
            MonetaryField::StartAssets => &mut state.start_assets,
            MonetaryField::EndAssets => &mut state.end_assets,
        };
        if !value.is_empty() {
            if let Some(stripped) = value.strip_prefix('-') {
                *value = stripped.to_string();
            } else {
                *value = format!("-{value}");
            }
        }

        self.store.set(FORM_STATE_KEY, &*state)?;
        Ok(state.clone())
    }

    /// Finalize the current form state into an immutable submission. The unit
    /// name is omitted for global scope, the specialty for general hospitals.
    pub async fn submission(&self) -> Submission {
        let state = self.state.read().await;
        Submission {
            analysis_scope: state.analysis_scope,
            unit_name: match state.analysis_scope {
                AnalysisScope::Unit => Some(state.unit_name.clone()),
                AnalysisScope::Global => None,
            },
            net_revenue: utils::parse_formatted(&state.net_revenue),
            start_assets: utils::parse_formatted(&state.start_assets),
            end_assets: utils::parse_formatted(&state.end_assets),
            bpjs_status: state.bpjs_status,
            hospital_type: state.hospital_type,
            hospital_specialty: match state.hospital_type {
                HospitalType::Khusus => Some(state.hospital_specialty.clone()),
                HospitalType::Umum => None,
            },
            ai_persona: state.ai_persona,
        }
    }

    /// Query string reproducing the current form state as a shareable link.
    pub async fn share_link(&self) -> String {
        let state = self.state.read().await;
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair(
            "netRevenue",
            &utils::parse_formatted(&state.net_revenue).to_string(),
        );
        query.append_pair(
            "startAssets",
            &utils::parse_formatted(&state.start_assets).to_string(),
        );
        query.append_pair(
            "endAssets",
            &utils::parse_formatted(&state.end_assets).to_string(),
        );
        query.append_pair("analysisScope", state.analysis_scope.as_str());
        query.append_pair("bpjsStatus", state.bpjs_status.as_str());
        query.append_pair("hospitalType", state.hospital_type.as_str());
        if state.analysis_scope == AnalysisScope::Unit {
            query.append_pair("unitName", &state.unit_name);
        }
        if state.hospital_type == HospitalType::Khusus {
            query.append_pair("hospitalSpecialty", &state.hospital_specialty);
        }
        query.append_pair("aiPersona", state.ai_persona.as_str());
        query.finish()
    }
}
