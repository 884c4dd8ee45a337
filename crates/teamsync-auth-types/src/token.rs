//! JWT session-claim issuance and validation.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use teamsync_domain::user::Role;

/// Session-claim lifetime in seconds (1 hour).
pub const TOKEN_TTL_SECS: u64 = 3600;

/// User identity extracted from a validated session claim.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub role: Role,
    pub exp: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("signing failed")]
    Signing,
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID (UUID string) |
/// | `role` | custom | role wire string, see [`teamsync_domain::user::Role`] |
/// | `exp` | `exp` | expiration, seconds since UNIX epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Sign a session claim for the given user, valid for [`TOKEN_TTL_SECS`].
///
/// Returns the encoded token and its expiration timestamp.
pub fn issue_access_token(
    user_id: Uuid,
    role: Role,
    secret: &str,
) -> Result<(String, u64), TokenError> {
    let exp = now_secs() + TOKEN_TTL_SECS;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        role: role.as_str().to_owned(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| TokenError::Signing)?;
    Ok((token, exp))
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// The library's default 60s leeway tolerates clock skew.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a bearer-token value, returning the parsed identity.
///
/// Middleware calls this on every protected request; the caller maps any
/// error to a single 401 without distinguishing the reason.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, TokenError> {
    let claims = decode_jwt(token, secret)?;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    let role = Role::from_str(&claims.role).ok_or(TokenError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        role,
        exp: claims.exp,
    })
}
