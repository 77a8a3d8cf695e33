//! Generative client error types

use thiserror::Error;

/// Errors that can occur while talking to the remote model
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key not found. Set the {env} environment variable.")]
    MissingApiKey { env: String },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if the remote rejected our credentials
    pub fn is_auth_error(&self) -> bool {
        match self {
            LlmError::MissingApiKey { .. } => true,
            LlmError::ApiError { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            LlmError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth_error() {
        assert!(
            LlmError::MissingApiKey {
                env: "GEMINI_API_KEY".to_string()
            }
            .is_auth_error()
        );
        assert!(
            LlmError::ApiError {
                status: 403,
                message: "Forbidden".to_string()
            }
            .is_auth_error()
        );
        assert!(
            !LlmError::ApiError {
                status: 500,
                message: "Server error".to_string()
            }
            .is_auth_error()
        );
        assert!(!LlmError::InvalidResponse("no candidates".to_string()).is_auth_error());
    }

    #[test]
    fn test_status() {
        let err = LlmError::ApiError {
            status: 429,
            message: "quota".to_string(),
        };
        assert_eq!(err.status(), Some(429));
        assert_eq!(LlmError::InvalidResponse("x".to_string()).status(), None);
    }

    #[test]
    fn test_missing_key_message_names_variable() {
        let err = LlmError::MissingApiKey {
            env: "MY_KEY".to_string(),
        };
        assert!(err.to_string().contains("MY_KEY"));
    }
}
