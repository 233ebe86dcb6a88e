/// Error handling for the authentication core
///
/// `AuthError` is the single error type returned by login and refresh.
/// Every kind except `System` is a terminal, user-facing outcome; `System`
/// carries the name of the operation whose store or cache I/O failed.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Authentication and token lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("incorrect username or password")]
    InvalidCredentials,

    #[error("max login attempts reached")]
    MaxAttemptsReached,

    #[error("invalid refresh token")]
    InvalidRefreshToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("access token is not close enough to expiry to be refreshed")]
    ConditionNotFulfilled,

    #[error("[{operation}] system error: {source}")]
    System {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl AuthError {
    /// Wrap a store, cache or runtime failure with the operation that hit it.
    pub fn system(operation: &'static str, source: impl Into<BoxError>) -> Self {
        AuthError::System {
            operation,
            source: source.into(),
        }
    }

    pub fn timed_out(operation: &'static str) -> Self {
        Self::system(operation, "deadline exceeded")
    }

    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::MaxAttemptsReached => "MAX_ATTEMPTS_REACHED",
            AuthError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthError::InvalidToken => "TOKEN_INVALID",
            AuthError::ConditionNotFulfilled => "CONDITION_NOT_FULFILLED",
            AuthError::System { .. } => "SYSTEM_ERROR",
        }
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AuthError::System { operation, source } => {
                tracing::error!(
                    request_id = request_id,
                    operation = operation,
                    error = %source,
                    "System error"
                );
            }
            _ => {
                tracing::warn!(
                    request_id = request_id,
                    error = %self,
                    "Authentication rejected"
                );
            }
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::MaxAttemptsReached => StatusCode::TOO_MANY_REQUESTS,
            AuthError::InvalidRefreshToken | AuthError::InvalidToken => StatusCode::FORBIDDEN,
            AuthError::ConditionNotFulfilled => StatusCode::BAD_REQUEST,
            AuthError::System { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let status = self.status_code();
        // System errors never leak the failing operation or its cause.
        let message = match self {
            AuthError::System { .. } => "system error".to_string(),
            _ => self.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse::new(
            request_id,
            message,
            self.code().to_string(),
            status.as_u16(),
        ))
    }
}
