//! Bearer-token identity extractor for protected routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use teamsync_auth_types::token::validate_access_token;
use teamsync_domain::user::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity decoded from the `Authorization: Bearer` header.
///
/// Rejects with 401 when the header is absent, the scheme is not Bearer,
/// or the token fails validation (expired, malformed, wrong signature) —
/// the reason is not distinguished to the caller.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(ToOwned::to_owned);
        let secret = state.jwt_secret.clone();

        async move {
            let token = token.ok_or(ApiError::Unauthorized)?;
            let info =
                validate_access_token(&token, &secret).map_err(|_| ApiError::Unauthorized)?;
            Ok(Self {
                user_id: info.user_id,
                role: info.role,
            })
        }
    }
}
