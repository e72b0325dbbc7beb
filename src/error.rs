use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced to API clients. Every variant maps to a fixed status
/// code and a safe `{"message": ...}` body; store and hashing detail stays
/// in the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Access denied. Valid token is required")]
    MissingCredential,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token has expired, please login again")]
    ExpiredToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found. Please try again")]
    UnknownUser,

    #[error("This account has been blocked")]
    Blocked,

    #[error("{0}")]
    NotFound(String),

    #[error("Registration failed")]
    RegistrationFailed,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::MissingCredential => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials
            | ApiError::ExpiredToken
            | ApiError::InvalidToken
            | ApiError::UnknownUser => StatusCode::UNAUTHORIZED,
            ApiError::Blocked => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RegistrationFailed | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!(error = %e, "internal error");
        }
        let body = ErrorBody {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::MissingCredential.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::ExpiredToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::UnknownUser.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Blocked.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::RegistrationFailed.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn expired_and_invalid_tokens_have_distinct_messages() {
        assert_ne!(
            ApiError::ExpiredToken.to_string(),
            ApiError::InvalidToken.to_string()
        );
    }

    #[test]
    fn internal_error_hides_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to db at 10.0.0.3"));
        let msg = err.to_string();
        assert!(!msg.contains("10.0.0.3"));
        assert_eq!(msg, "Internal server error");
    }

    #[test]
    fn error_body_serializes_message() {
        let body = ErrorBody {
            message: ApiError::Blocked.to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"message\""));
        assert!(json.contains("blocked"));
    }
}
