use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IntoActiveModel as _, QueryFilter, QueryOrder, QuerySelect,
    SqlErr, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use teamsync_domain::user::{Gender, Role};
use teamsync_schema::{audit_events, otp_codes, outbox_events, users};

use crate::domain::repository::{
    AuditLogRepository, OtpRepository, OutboxRepository, UserRepository,
};
use crate::domain::types::{AuditEvent, OtpCode, OutboxEvent, PendingOutboxEvent, User, UserPatch};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Email.eq(identifier))
                    .add(users::Column::CompanyId.eq(identifier)),
            )
            .one(&self.db)
            .await
            .context("find user by identifier")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models
            .into_iter()
            .map(user_from_model)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            full_name: Set(user.full_name.clone()),
            company_id: Set(user.company_id.clone()),
            email: Set(user.email.clone()),
            dob: Set(user.dob),
            gender: Set(user.gender.as_str().to_owned()),
            role: Set(user.role.as_str().to_owned()),
            password_hash: Set(user.password_hash.clone()),
            contact_number: Set(user.contact_number.clone()),
            locked: Set(user.locked),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::DuplicateUser),
                _ => Err(anyhow::Error::new(e).context("create user").into()),
            },
        }
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, ApiError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for update")?
        else {
            return Ok(None);
        };

        let mut am = model.into_active_model();
        if let Some(ref full_name) = patch.full_name {
            am.full_name = Set(full_name.clone());
        }
        if let Some(ref company_id) = patch.company_id {
            am.company_id = Set(company_id.clone());
        }
        if let Some(ref email) = patch.email {
            am.email = Set(email.clone());
        }
        if let Some(dob) = patch.dob {
            am.dob = Set(dob);
        }
        if let Some(gender) = patch.gender {
            am.gender = Set(gender.as_str().to_owned());
        }
        if let Some(role) = patch.role {
            am.role = Set(role.as_str().to_owned());
        }
        if let Some(ref contact_number) = patch.contact_number {
            am.contact_number = Set(contact_number.clone());
        }

        match am.update(&self.db).await {
            Ok(updated) => Ok(Some(user_from_model(updated)?)),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::DuplicateUser),
                _ => Err(anyhow::Error::new(e).context("update user").into()),
            },
        }
    }

    async fn set_locked(&self, id: Uuid, locked: bool) -> Result<Option<User>, ApiError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for lock change")?
        else {
            return Ok(None);
        };

        let mut am = model.into_active_model();
        am.locked = Set(locked);
        let updated = am.update(&self.db).await.context("set locked flag")?;
        Ok(Some(user_from_model(updated)?))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<User, anyhow::Error> {
    let gender = Gender::from_str(&model.gender)
        .ok_or_else(|| anyhow::anyhow!("unknown gender in users row: {}", model.gender))?;
    let role = Role::from_str(&model.role)
        .ok_or_else(|| anyhow::anyhow!("unknown role in users row: {}", model.role))?;
    Ok(User {
        id: model.id,
        full_name: model.full_name,
        company_id: model.company_id,
        email: model.email,
        dob: model.dob,
        gender,
        role,
        password_hash: model.password_hash,
        contact_number: model.contact_number,
        locked: model.locked,
        created_at: model.created_at,
    })
}

// ── OTP repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn replace_with_outbox(
        &self,
        otp: &OtpCode,
        event: &OutboxEvent,
    ) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let otp = otp.clone();
                let event = event.clone();
                Box::pin(async move {
                    otp_codes::Entity::delete_many()
                        .filter(otp_codes::Column::Email.eq(otp.email.clone()))
                        .exec(txn)
                        .await?;
                    insert_otp(txn, &otp).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("replace otp with outbox")?;
        Ok(())
    }

    async fn find_valid(&self, email: &str, code: &str) -> Result<Option<OtpCode>, ApiError> {
        let now = Utc::now();
        let model = otp_codes::Entity::find()
            .filter(otp_codes::Column::Email.eq(email))
            .filter(otp_codes::Column::Code.eq(code))
            .filter(otp_codes::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find valid otp")?;
        Ok(model.map(otp_from_model))
    }

    async fn consume_with_password_reset(
        &self,
        otp: &OtpCode,
        password_hash: &str,
        event: &OutboxEvent,
    ) -> Result<bool, ApiError> {
        let otp_id = otp.id;
        let email = otp.email.clone();
        let password_hash = password_hash.to_owned();
        let event = event.clone();
        let updated = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    otp_codes::Entity::delete_many()
                        .filter(otp_codes::Column::Id.eq(otp_id))
                        .exec(txn)
                        .await?;
                    let result = users::Entity::update_many()
                        .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
                        .filter(users::Column::Email.eq(email))
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }
                    insert_outbox_event(txn, &event).await?;
                    Ok(true)
                })
            })
            .await
            .context("consume otp with password reset")?;
        Ok(updated)
    }
}

async fn insert_otp(txn: &DatabaseTransaction, otp: &OtpCode) -> Result<(), sea_orm::DbErr> {
    otp_codes::ActiveModel {
        id: Set(otp.id),
        email: Set(otp.email.clone()),
        code: Set(otp.code.clone()),
        issued_at: Set(otp.issued_at),
        expires_at: Set(otp.expires_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn otp_from_model(model: otp_codes::Model) -> OtpCode {
    OtpCode {
        id: model.id,
        email: model.email,
        code: model.code,
        issued_at: model.issued_at,
        expires_at: model.expires_at,
    }
}

// ── Outbox repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxRepository {
    pub db: DatabaseConnection,
}

impl OutboxRepository for DbOutboxRepository {
    async fn fetch_due(
        &self,
        limit: u64,
        now: DateTime<Utc>,
    ) -> Result<Vec<PendingOutboxEvent>, ApiError> {
        let models = outbox_events::Entity::find()
            .filter(outbox_events::Column::ProcessedAt.is_null())
            .filter(outbox_events::Column::FailedAt.is_null())
            .filter(outbox_events::Column::NextAttemptAt.lte(now))
            .order_by_asc(outbox_events::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("fetch due outbox events")?;
        Ok(models
            .into_iter()
            .map(|model| PendingOutboxEvent {
                event: OutboxEvent {
                    id: model.id,
                    kind: model.kind,
                    payload: model.payload,
                    idempotency_key: model.idempotency_key,
                },
                attempts: model.attempts,
            })
            .collect())
    }

    async fn mark_processed(&self, id: Uuid) -> Result<(), ApiError> {
        outbox_events::ActiveModel {
            id: Set(id),
            processed_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark outbox event processed")?;
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
        permanent: bool,
    ) -> Result<(), ApiError> {
        let mut am = outbox_events::ActiveModel {
            id: Set(id),
            attempts: Set(attempts),
            last_error: Set(Some(error.to_owned())),
            next_attempt_at: Set(next_attempt_at),
            ..Default::default()
        };
        if permanent {
            am.failed_at = Set(Some(Utc::now()));
        }
        am.update(&self.db)
            .await
            .context("mark outbox event failed")?;
        Ok(())
    }
}

// ── Audit log repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuditLogRepository {
    pub db: DatabaseConnection,
}

impl AuditLogRepository for DbAuditLogRepository {
    async fn append(&self, event: &AuditEvent) -> Result<(), ApiError> {
        audit_events::ActiveModel {
            id: Set(event.id),
            actor_id: Set(event.actor_id),
            action: Set(event.action.clone()),
            target_id: Set(event.target_id),
            detail: Set(event.detail.clone()),
            created_at: Set(event.created_at),
        }
        .insert(&self.db)
        .await
        .context("append audit event")?;
        Ok(())
    }
}
