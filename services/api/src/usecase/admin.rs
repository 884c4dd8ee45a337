//! Admin account management.
//!
//! Every mutation re-checks the caller's role here, at the workflow
//! boundary; client-side gating is presentation only. Mutations append to
//! the audit log.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use teamsync_domain::user::Role;
use teamsync_domain::validate::{
    MIN_SIGNUP_AGE, age_on, validate_company_id, validate_contact_number,
};

use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::domain::types::{AuditEvent, User, UserPatch};
use crate::error::ApiError;

/// The authenticated caller of an admin operation.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

fn require_admin(actor: Actor) -> Result<(), ApiError> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, actor: Actor) -> Result<Vec<User>, ApiError> {
        require_admin(actor)?;
        self.users.list().await
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserUseCase<R, A>
where
    R: UserRepository,
    A: AuditLogRepository,
{
    pub users: R,
    pub audit: A,
}

impl<R, A> UpdateUserUseCase<R, A>
where
    R: UserRepository,
    A: AuditLogRepository,
{
    pub async fn execute(
        &self,
        actor: Actor,
        target_id: Uuid,
        patch: UserPatch,
    ) -> Result<User, ApiError> {
        require_admin(actor)?;

        if patch.is_empty() {
            return Err(ApiError::Validation("No fields to update.".into()));
        }
        // Present fields obey the same rules as signup.
        if let Some(ref full_name) = patch.full_name {
            if full_name.trim().is_empty() {
                return Err(ApiError::Validation("Full name cannot be empty.".into()));
            }
        }
        if let Some(ref email) = patch.email {
            if email.trim().is_empty() {
                return Err(ApiError::Validation("Email cannot be empty.".into()));
            }
        }
        if let Some(ref company_id) = patch.company_id {
            if !validate_company_id(company_id) {
                return Err(ApiError::Validation(
                    "CompanyID must be TS followed by 5 digits.".into(),
                ));
            }
        }
        if let Some(dob) = patch.dob {
            if age_on(dob, Utc::now().date_naive()) < MIN_SIGNUP_AGE {
                return Err(ApiError::Validation(
                    "You must be at least 18 years old to sign up.".into(),
                ));
            }
        }
        if let Some(ref contact_number) = patch.contact_number {
            if !validate_contact_number(contact_number) {
                return Err(ApiError::Validation(
                    "Contact number must have exactly 10 digits.".into(),
                ));
            }
        }

        let user = self
            .users
            .update(target_id, &patch)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let mut fields = Vec::new();
        if patch.full_name.is_some() {
            fields.push("fullName");
        }
        if patch.company_id.is_some() {
            fields.push("companyID");
        }
        if patch.email.is_some() {
            fields.push("email");
        }
        if patch.dob.is_some() {
            fields.push("dob");
        }
        if patch.gender.is_some() {
            fields.push("gender");
        }
        if patch.role.is_some() {
            fields.push("role");
        }
        if patch.contact_number.is_some() {
            fields.push("contactNumber");
        }
        self.audit
            .append(&AuditEvent::new(
                actor.user_id,
                "user_updated",
                target_id,
                json!({ "fields": fields }),
            ))
            .await?;

        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R, A>
where
    R: UserRepository,
    A: AuditLogRepository,
{
    pub users: R,
    pub audit: A,
}

impl<R, A> DeleteUserUseCase<R, A>
where
    R: UserRepository,
    A: AuditLogRepository,
{
    pub async fn execute(&self, actor: Actor, target_id: Uuid) -> Result<(), ApiError> {
        require_admin(actor)?;

        let deleted = self.users.delete(target_id).await?;
        if !deleted {
            return Err(ApiError::UserNotFound);
        }

        self.audit
            .append(&AuditEvent::new(
                actor.user_id,
                "user_deleted",
                target_id,
                json!({}),
            ))
            .await
    }
}

// ── SetLock (terminate / unlock) ─────────────────────────────────────────────

pub struct SetLockUseCase<R, A>
where
    R: UserRepository,
    A: AuditLogRepository,
{
    pub users: R,
    pub audit: A,
}

impl<R, A> SetLockUseCase<R, A>
where
    R: UserRepository,
    A: AuditLogRepository,
{
    /// Idempotent: locking a locked account (or unlocking an unlocked one)
    /// succeeds without changing state. No guard against an admin locking
    /// their own account; the action is unconditional.
    pub async fn execute(
        &self,
        actor: Actor,
        target_id: Uuid,
        locked: bool,
    ) -> Result<User, ApiError> {
        require_admin(actor)?;

        let user = self
            .users
            .set_locked(target_id, locked)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let action = if locked { "user_locked" } else { "user_unlocked" };
        self.audit
            .append(&AuditEvent::new(actor.user_id, action, target_id, json!({})))
            .await?;

        Ok(user)
    }
}
