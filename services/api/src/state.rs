use sea_orm::DatabaseConnection;

use crate::infra::assistant::OpenAiAssistant;
use crate::infra::db::{
    DbAuditLogRepository, DbOtpRepository, DbOutboxRepository, DbUserRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub assistant: OpenAiAssistant,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_repo(&self) -> DbOutboxRepository {
        DbOutboxRepository {
            db: self.db.clone(),
        }
    }

    pub fn audit_repo(&self) -> DbAuditLogRepository {
        DbAuditLogRepository {
            db: self.db.clone(),
        }
    }
}
