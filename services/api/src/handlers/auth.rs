use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use teamsync_domain::user::{Gender, Role};

use crate::error::ApiError;
use crate::identity::Identity;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};
use crate::usecase::password_reset::{RequestResetUseCase, VerifyOtpInput, VerifyOtpUseCase};
use crate::usecase::profile::GetProfileUseCase;
use crate::usecase::signup::{SignupInput, SignupUseCase};

use super::UserResponse;

// A missing or malformed body is a validation failure (400), not a 422.
pub(super) fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(rejection.body_text())
}

// ── POST /api/auth/signup ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: String,
    #[serde(rename = "companyID")]
    pub company_id: String,
    pub dob: NaiveDate,
    pub email: String,
    pub gender: Gender,
    pub role: Role,
    pub password: String,
    pub contact_number: String,
}

pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = body.map_err(bad_body)?;
    let usecase = SignupUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(SignupInput {
            full_name: body.full_name,
            company_id: body.company_id,
            dob: body.dob,
            email: body.email,
            gender: body.gender,
            role: body.role,
            password: body.password,
            contact_number: body.contact_number,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "msg": "Signup Complete" }))))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub msg: String,
    pub token: String,
    pub role: Role,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "companyID")]
    pub company_id: String,
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(body) = body.map_err(bad_body)?;
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            company_id: body.company_id,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        msg: "Login successful!".to_owned(),
        token: out.token,
        role: out.role,
        full_name: out.full_name,
        company_id: out.company_id,
    }))
}

// ── GET /api/auth/me ─────────────────────────────────────────────────────────

pub async fn me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

// ── POST /api/auth/forgot-password ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(bad_body)?;
    let identifier = body
        .email
        .filter(|s| !s.trim().is_empty())
        .or(body.company_id)
        .unwrap_or_default();
    let usecase = RequestResetUseCase {
        users: state.user_repo(),
        otps: state.otp_repo(),
    };
    usecase.execute(&identifier).await?;
    Ok(Json(
        json!({ "msg": "OTP sent successfully to your email!" }),
    ))
}

// ── POST /api/auth/verify-otp ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default, rename = "newPassword")]
    pub new_password: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    body: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(bad_body)?;
    let usecase = VerifyOtpUseCase {
        users: state.user_repo(),
        otps: state.otp_repo(),
    };
    usecase
        .execute(VerifyOtpInput {
            email: body.email,
            otp: body.otp,
            new_password: body.new_password,
        })
        .await?;
    Ok(Json(json!({ "msg": "Password successfully reset!" })))
}
