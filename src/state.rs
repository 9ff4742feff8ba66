use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::AnalysisResult;
use crate::external::generative_provider::GenerativeProvider;
use crate::services::advisor_service::AdvisorService;
use crate::services::form_service::FormService;
use crate::services::history_service::HistoryService;
use crate::store::kv::FileStore;

/// Transient result pane state. At most one of `error`/`result` is set; both
/// are lost on restart.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<AnalysisResult>,
}

#[derive(Clone)]
pub struct AppState {
    pub form: Arc<FormService>,
    pub advisor: Arc<AdvisorService>,
    pub history: Arc<HistoryService>,
    pub dashboard: Arc<RwLock<Dashboard>>,
}

impl AppState {
    pub fn new(store: Arc<FileStore>, provider: Arc<dyn GenerativeProvider>) -> Self {
        Self {
            form: Arc::new(FormService::new(Arc::clone(&store))),
            advisor: Arc::new(AdvisorService::new(provider)),
            history: Arc::new(HistoryService::new(store)),
            dashboard: Arc::new(RwLock::new(Dashboard::default())),
        }
    }
}
