use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use teamsync_domain::user::{Gender, Role};

/// A user account. `password_hash` never leaves the service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub company_id: String,
    pub email: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub role: Role,
    pub password_hash: String,
    pub contact_number: String,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
}

/// The admin-editable field set; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub company_id: Option<String>,
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub role: Option<Role>,
    pub contact_number: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.company_id.is_none()
            && self.email.is_none()
            && self.dob.is_none()
            && self.gender.is_none()
            && self.role.is_none()
            && self.contact_number.is_none()
    }
}

/// One-time password bound to an email address.
#[derive(Debug, Clone)]
pub struct OtpCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OtpCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Outbox event for async mail delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// An outbox event together with its delivery bookkeeping, as read back by
/// the dispatcher.
#[derive(Debug, Clone)]
pub struct PendingOutboxEvent {
    pub event: OutboxEvent,
    pub attempts: i32,
}

/// Append-only record of an administrative action.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub target_id: Uuid,
    pub detail: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(actor_id: Uuid, action: &str, target_id: Uuid, detail: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id,
            action: action.to_owned(),
            target_id,
            detail,
            created_at: Utc::now(),
        }
    }
}

/// OTP length in characters.
pub const OTP_LEN: usize = 6;

/// OTP time-to-live in seconds (5 minutes).
pub const OTP_TTL_SECS: i64 = 300;

/// Delivery attempts before an outbox event is marked permanently failed.
pub const OUTBOX_MAX_ATTEMPTS: i32 = 5;
