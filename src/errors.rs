use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Body returned for every non-authorization error
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// HTTP status code
    pub code: u16,
    /// Canonical reason phrase for the status
    pub status: String,
    /// Human-readable message
    pub message: String,
}

/// Body returned for every authorization error
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthErrorBody {
    /// Human-readable description
    pub description: String,
    /// Machine-readable error code, e.g. `token_revoked`
    pub error: String,
}

/// Failures of the token and credential checks, all answered with 401
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Request does not contain an access token.")]
    MissingToken,
    #[error("Signature verification failed.")]
    InvalidToken,
    #[error("Only {expected} tokens are allowed.")]
    WrongTokenType { expected: &'static str },
    #[error("The token has expired.")]
    TokenExpired,
    #[error("The token has been removed.")]
    TokenRevoked,
    #[error("The token is not fresh.")]
    FreshTokenRequired,
    #[error("Admin privilege required.")]
    AdminRequired,
    #[error("Invalid credentials.")]
    InvalidCredentials,
}

impl AuthError {
    /// The machine-readable code sent in the `error` field
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "authorization_required",
            AuthError::InvalidToken | AuthError::WrongTokenType { .. } => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenRevoked => "token_revoked",
            AuthError::FreshTokenRequired => "fresh_token_required",
            AuthError::AdminRequired => "admin_required",
            AuthError::InvalidCredentials => "invalid_credentials",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = AuthErrorBody {
            description: self.to_string(),
            error: self.code().to_string(),
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Maps a repository error to `Conflict` when it is a unique-constraint
    /// violation, and to `Internal` otherwise
    pub fn conflict_or_internal(err: anyhow::Error, message: impl Into<String>) -> Self {
        if is_unique_violation(&err) {
            ApiError::Conflict(message.into())
        } else {
            ApiError::Internal(err)
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Auth(err) => return err.into_response(),
            ApiError::Internal(err) => {
                error!("Internal error while handling request: {:#}", err);
                "Internal server error".to_string()
            }
            ApiError::NotFound(msg) | ApiError::Validation(msg) | ApiError::Conflict(msg) => msg,
        };

        let body = Json(ErrorBody {
            code: status.as_u16(),
            status: status.canonical_reason().unwrap_or_default().to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Whether the error wraps a diesel unique-constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DieselError>(),
        Some(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
    )
}

/// Whether the error wraps a diesel foreign-key violation
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DieselError>(),
        Some(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _))
    )
}
