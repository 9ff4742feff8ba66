use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::external::generative_provider::{GenerativeError, GenerativeProvider};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn from_env() -> Result<Self, GenerativeError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GenerativeError::Api("GEMINI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, GenerativeError> {
        info!("Requesting Gemini completion (model: {})", self.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(format!("{BASE_URL}/models/{}:generateContent", self.model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerativeError::Timeout
                } else {
                    GenerativeError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 429 {
            return Err(GenerativeError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerativeError::Api(format!("HTTP {status}: {error_text}")));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerativeError::InvalidResponse(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GenerativeError::InvalidResponse("no candidates in response".into()))?
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(GenerativeError::InvalidResponse("empty candidate text".into()));
        }

        Ok(text)
    }
}
