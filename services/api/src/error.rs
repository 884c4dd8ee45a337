use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// API service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("User with Email or CompanyID already exists.")]
    DuplicateUser,
    #[error("CompanyID/Email or Password incorrect!")]
    InvalidCredentials,
    #[error("Your account has been locked. Please contact an administrator.")]
    AccountLocked,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid or expired OTP.")]
    InvalidOtp,
    #[error("support assistant unavailable")]
    AssistantUnavailable,
    #[error("Server Error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::DuplicateUser => "DUPLICATE_USER",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidOtp => "INVALID_OTP",
            Self::AssistantUnavailable => "ASSISTANT_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_)
            | Self::DuplicateUser
            | Self::InvalidCredentials
            | Self::InvalidOtp => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AccountLocked | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::AssistantUnavailable | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "msg": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
