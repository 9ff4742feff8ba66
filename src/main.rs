use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use adiwidia_backend::external::gemini::GeminiProvider;
use adiwidia_backend::state::AppState;
use adiwidia_backend::store::kv::FileStore;
use adiwidia_backend::{app, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logging::init_logging(logging::LoggingConfig::from_env())?;

    // Missing credential is a hard stop: the AI analysis is the product,
    // there is no degraded mode without it.
    let provider = GeminiProvider::from_env()
        .expect("Failed to create GeminiProvider (check GEMINI_API_KEY)");

    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let store = Arc::new(FileStore::open(&data_dir)?);

    let state = AppState::new(store, Arc::new(provider));
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Adiwidia backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
