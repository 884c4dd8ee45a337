#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{AuditEvent, OtpCode, OutboxEvent, PendingOutboxEvent, User, UserPatch};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    /// Look up by email or company ID in a single query.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, ApiError>;

    async fn list(&self) -> Result<Vec<User>, ApiError>;

    /// Conditional insert: the unique indexes on email and company_id decide
    /// duplicates, surfaced as `ApiError::DuplicateUser`. No prior existence
    /// check, so concurrent signups cannot both pass.
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Apply a partial update. Returns the updated user, or `None` when the
    /// id does not exist. Duplicate email/company_id surfaces as
    /// `ApiError::DuplicateUser`.
    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, ApiError>;

    /// Set the locked flag. Returns the updated user, or `None` when absent.
    /// Idempotent: setting an already-equal value is a state no-op.
    async fn set_locked(&self, id: Uuid, locked: bool) -> Result<Option<User>, ApiError>;

    /// Hard delete. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for one-time passwords.
pub trait OtpRepository: Send + Sync {
    /// Replace the outstanding code for `otp.email` (if any) with `otp`, and
    /// enqueue the notification event, all in one transaction. A mail
    /// failure later cannot orphan the code, and at most one code per email
    /// is ever live.
    async fn replace_with_outbox(&self, otp: &OtpCode, event: &OutboxEvent)
    -> Result<(), ApiError>;

    /// Find the code matching `(email, code)` whose expiry lies in the
    /// future. The comparison against now is explicit; nothing relies on
    /// storage-level TTLs.
    async fn find_valid(&self, email: &str, code: &str) -> Result<Option<OtpCode>, ApiError>;

    /// Single transaction: delete the code (single use), replace the user's
    /// password hash, and enqueue the confirmation event. Returns `false`
    /// when no user row matched the email.
    async fn consume_with_password_reset(
        &self,
        otp: &OtpCode,
        password_hash: &str,
        event: &OutboxEvent,
    ) -> Result<bool, ApiError>;
}

/// Repository for outbox events, used by the dispatcher.
pub trait OutboxRepository: Send + Sync {
    /// Events due for delivery: unprocessed, not permanently failed, and
    /// `next_attempt_at <= now`, oldest first.
    async fn fetch_due(
        &self,
        limit: u64,
        now: DateTime<Utc>,
    ) -> Result<Vec<PendingOutboxEvent>, ApiError>;

    async fn mark_processed(&self, id: Uuid) -> Result<(), ApiError>;

    /// Record a failed attempt. `permanent` additionally sets `failed_at`,
    /// taking the event out of rotation.
    async fn mark_failed(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
        permanent: bool,
    ) -> Result<(), ApiError>;
}

/// Append-only audit log of admin actions.
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, event: &AuditEvent) -> Result<(), ApiError>;
}

/// Port for sending transactional email.
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), anyhow::Error>;
}

/// Port for the chat-completion backend of the support endpoint.
pub trait AssistantPort: Send + Sync {
    async fn complete(&self, message: &str) -> Result<String, ApiError>;
}
