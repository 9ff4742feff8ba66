use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use thiserror::Error;

use crate::external::generative_provider::GenerativeError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Input violates a domain rule. Checked before any network call.
    #[error("{0}")]
    Validation(String),

    /// The AI service stayed unusable after exhausting retries. Carries the
    /// fixed explanatory message plus the last underlying failure.
    #[error("{message}")]
    Ai {
        message: String,
        #[source]
        source: GenerativeError,
    },

    /// A submission is already in flight.
    #[error("analysis already in progress")]
    Busy,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    /// The single user-facing message for this failure, prefixed by kind.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("Kesalahan Input: {msg}"),
            AppError::Ai { message, .. } => format!("Kesalahan Analisis AI: {message}"),
            AppError::Busy => {
                "Analisis lain sedang berjalan. Tunggu hingga selesai.".to_string()
            }
            AppError::Unexpected(err) => {
                let msg = err.to_string();
                if msg.is_empty() {
                    "Terjadi kesalahan yang tidak diketahui.".to_string()
                } else {
                    format!("Terjadi kesalahan yang tidak terduga: {msg}")
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let message = self.user_message();
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, message).into_response(),
            AppError::Ai { .. } => (StatusCode::BAD_GATEWAY, message).into_response(),
            AppError::Busy => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("5"));
                (StatusCode::CONFLICT, headers, message).into_response()
            }
            AppError::Unexpected(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_gets_input_prefix() {
        let err = AppError::Validation("Rata-rata total aset tidak boleh nol.".into());
        assert_eq!(
            err.user_message(),
            "Kesalahan Input: Rata-rata total aset tidak boleh nol."
        );
    }

    #[test]
    fn ai_message_gets_ai_prefix() {
        let err = AppError::Ai {
            message: "Layanan AI tidak merespons.".into(),
            source: GenerativeError::Timeout,
        };
        assert!(err.user_message().starts_with("Kesalahan Analisis AI: "));
    }

    #[test]
    fn unexpected_message_interpolates_cause() {
        let err = AppError::Unexpected(anyhow::anyhow!("disk penuh"));
        assert_eq!(
            err.user_message(),
            "Terjadi kesalahan yang tidak terduga: disk penuh"
        );
    }
}
