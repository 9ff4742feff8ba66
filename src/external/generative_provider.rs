use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerativeError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("rate limited")]
    RateLimited,

    #[error("api error: {0}")]
    Api(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Black-box text-completion service: one prompt in, one text response out.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerativeError>;
}
