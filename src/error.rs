use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error taxonomy. Every handler returns `Result<_, ApiError>` and the
/// single `IntoResponse` impl below serializes the `{status, message, details}`
/// envelope the clients consume.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation { message: String, details: Vec<String> },
    #[error("{message}")]
    Conflict { message: String, details: Vec<String> },
    #[error("{message}")]
    Unauthorized { message: String, details: Vec<String> },
    #[error("{message}")]
    Forbidden { message: String, details: Vec<String> },
    #[error("{message}")]
    NotFound { message: String },
    #[error(transparent)]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// 400 without per-rule details.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn conflict(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn unauthorized_with(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn forbidden_with(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, details) = match self {
            Self::Validation { message, details }
            | Self::Conflict { message, details }
            | Self::Unauthorized { message, details }
            | Self::Forbidden { message, details } => (message, details),
            Self::NotFound { message } => (message, Vec::new()),
            Self::Internal(e) => {
                error!(error = %e, "internal error");
                ("An unexpected error occurred.".to_string(), Vec::new())
            }
        };

        let body = json!({
            "status": status.as_u16(),
            "message": message,
            "details": details,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::validation("bad", vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::conflict("taken", vec![]).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::unauthorized("nope").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("nope").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::not_found("missing").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn envelope_carries_status_message_and_details() {
        let err = ApiError::validation(
            "Invalid password.",
            vec!["too short".into(), "no digit".into()],
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 400);
        assert_eq!(body["message"], "Invalid password.");
        assert_eq!(body["details"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn internal_errors_never_leak_details() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3"));
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "An unexpected error occurred.");
        assert!(body["details"].as_array().unwrap().is_empty());
    }
}
