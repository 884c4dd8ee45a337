use chrono::{Duration, Utc};
use rand::RngExt;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{OtpRepository, UserRepository};
use crate::domain::types::{OTP_LEN, OTP_TTL_SECS, OtpCode, OutboxEvent};
use crate::error::ApiError;
use crate::password::hash_password;

/// Charset for generated codes. Ambiguous glyphs (0/o, 1/i/l) are left out
/// so the code survives being read off a phone screen.
const CHARSET: &[u8] = b"23456789abcdefghjkmnpqrstuvwxyz";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

// ── RequestReset (forgot password) ───────────────────────────────────────────

pub struct RequestResetUseCase<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    pub users: U,
    pub otps: O,
}

impl<U, O> RequestResetUseCase<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    pub async fn execute(&self, identifier: &str) -> Result<(), ApiError> {
        if identifier.trim().is_empty() {
            return Err(ApiError::Validation(
                "Please enter CompanyID/Email.".into(),
            ));
        }

        // The code is always bound to the account's stored email, not to
        // whatever identifier the caller supplied.
        let user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let now = Utc::now();
        let otp = OtpCode {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            code: generate_code(),
            issued_at: now,
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
        };

        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "otp_issued".to_owned(),
            payload: json!({ "email": user.email, "code": otp.code }),
            idempotency_key: format!("otp_issued:{}", otp.id),
        };

        // One transaction: any earlier code for this email is gone, the new
        // code and its mail handoff land together. Delivery itself is the
        // dispatcher's job; this request no longer waits on SMTP.
        self.otps.replace_with_outbox(&otp, &event).await
    }
}

// ── VerifyOtp (reset password) ───────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

pub struct VerifyOtpUseCase<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    pub users: U,
    pub otps: O,
}

impl<U, O> VerifyOtpUseCase<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<(), ApiError> {
        if input.email.trim().is_empty() || input.otp.trim().is_empty() || input.new_password.is_empty()
        {
            return Err(ApiError::Validation(
                "Please provide email, OTP, and new password.".into(),
            ));
        }

        let otp = self
            .otps
            .find_valid(&input.email, &input.otp)
            .await?
            .ok_or(ApiError::InvalidOtp)?;

        let user = self
            .users
            .find_by_identifier(&input.email)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let password_hash = hash_password(&input.new_password)?;

        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "password_reset".to_owned(),
            payload: json!({ "email": user.email, "fullName": user.full_name }),
            idempotency_key: format!("password_reset:{}", otp.id),
        };

        // Consume the code, swap the hash, and enqueue the confirmation in
        // one transaction; the same (email, code) pair can never reset twice.
        let updated = self
            .otps
            .consume_with_password_reset(&otp, &password_hash, &event)
            .await?;
        if !updated {
            return Err(ApiError::UserNotFound);
        }
        Ok(())
    }
}
