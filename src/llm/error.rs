use reqwest::StatusCode;
use thiserror::Error;

use super::types::ApiErrorBody;

/// Failures surfaced by a provider client. The relay hands these back to
/// its caller untouched.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("required environment variable {var} is not set")]
    MissingCredential { var: String },

    #[error("authentication rejected ({status}): {message}")]
    Authentication { status: StatusCode, message: String },

    #[error("rate limited by provider: {message}")]
    RateLimited { message: String },

    #[error("provider error {status}: {message}")]
    Provider { status: StatusCode, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response from provider: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Classify a non-success HTTP reply.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.trim().to_string());

        // Gemini answers an invalid key with 400 rather than 401.
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || (status == StatusCode::BAD_REQUEST && body.contains("API_KEY_INVALID"))
        {
            return Self::Authentication { status, message };
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Self::RateLimited { message };
        }

        Self::Provider { status, message }
    }
}
