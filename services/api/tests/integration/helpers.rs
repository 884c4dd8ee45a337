use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use teamsync_domain::user::{Gender, Role};

use teamsync_api::domain::repository::{
    AssistantPort, AuditLogRepository, Mailer, OtpRepository, OutboxRepository, UserRepository,
};
use teamsync_api::domain::types::{
    AuditEvent, OtpCode, OutboxEvent, PendingOutboxEvent, User, UserPatch,
};
use teamsync_api::error::ApiError;
use teamsync_api::password::hash_password;

pub use teamsync_testing::auth::TEST_JWT_SECRET;

pub const TEST_PASSWORD: &str = "Abcd123!";

pub fn test_user() -> User {
    User {
        id: Uuid::now_v7(),
        full_name: "A".to_owned(),
        company_id: "TS00001".to_owned(),
        email: "a@x.com".to_owned(),
        dob: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        gender: Gender::Male,
        role: Role::Employee,
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        contact_number: "1234567890".to_owned(),
        locked: false,
        created_at: Utc::now(),
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

/// In-memory user store. `create` and `update` refuse duplicate email or
/// company ID, standing in for the database's unique indexes.
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the backing list for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == identifier || u.company_id == identifier)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.email == user.email || u.company_id == user.company_id)
        {
            return Err(ApiError::DuplicateUser);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(ref email) = patch.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(ApiError::DuplicateUser);
            }
        }
        if let Some(ref company_id) = patch.company_id {
            if users.iter().any(|u| u.id != id && &u.company_id == company_id) {
                return Err(ApiError::DuplicateUser);
            }
        }
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(ref full_name) = patch.full_name {
            user.full_name = full_name.clone();
        }
        if let Some(ref company_id) = patch.company_id {
            user.company_id = company_id.clone();
        }
        if let Some(ref email) = patch.email {
            user.email = email.clone();
        }
        if let Some(dob) = patch.dob {
            user.dob = dob;
        }
        if let Some(gender) = patch.gender {
            user.gender = gender;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(ref contact_number) = patch.contact_number {
            user.contact_number = contact_number.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn set_locked(&self, id: Uuid, locked: bool) -> Result<Option<User>, ApiError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.locked = locked;
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

/// Single-slot-per-email OTP store sharing the user list so password
/// resets are observable.
pub struct MockOtpRepo {
    pub slots: Arc<Mutex<HashMap<String, OtpCode>>>,
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockOtpRepo {
    pub fn new(users: Arc<Mutex<Vec<User>>>) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            events: Arc::new(Mutex::new(Vec::new())),
            users,
        }
    }

    pub fn slots_handle(&self) -> Arc<Mutex<HashMap<String, OtpCode>>> {
        Arc::clone(&self.slots)
    }

    pub fn events_handle(&self) -> Arc<Mutex<Vec<OutboxEvent>>> {
        Arc::clone(&self.events)
    }
}

impl OtpRepository for MockOtpRepo {
    async fn replace_with_outbox(
        &self,
        otp: &OtpCode,
        event: &OutboxEvent,
    ) -> Result<(), ApiError> {
        self.slots
            .lock()
            .unwrap()
            .insert(otp.email.clone(), otp.clone());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_valid(&self, email: &str, code: &str) -> Result<Option<OtpCode>, ApiError> {
        let now = Utc::now();
        Ok(self
            .slots
            .lock()
            .unwrap()
            .get(email)
            .filter(|otp| otp.code == code && !otp.is_expired(now))
            .cloned())
    }

    async fn consume_with_password_reset(
        &self,
        otp: &OtpCode,
        password_hash: &str,
        event: &OutboxEvent,
    ) -> Result<bool, ApiError> {
        let mut slots = self.slots.lock().unwrap();
        if slots.get(&otp.email).map(|o| o.id) == Some(otp.id) {
            slots.remove(&otp.email);
        }
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.email == otp.email) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_owned();
        self.events.lock().unwrap().push(event.clone());
        Ok(true)
    }
}

// ── MockAuditLog ─────────────────────────────────────────────────────────────

pub struct MockAuditLog {
    pub events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MockAuditLog {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events_handle(&self) -> Arc<Mutex<Vec<AuditEvent>>> {
        Arc::clone(&self.events)
    }
}

impl AuditLogRepository for MockAuditLog {
    async fn append(&self, event: &AuditEvent) -> Result<(), ApiError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ── MockOutboxRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct OutboxRow {
    pub event: OutboxEvent,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub next_attempt_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

pub struct MockOutboxRepo {
    pub rows: Arc<Mutex<Vec<OutboxRow>>>,
}

impl MockOutboxRepo {
    pub fn new(events: Vec<OutboxEvent>, now: DateTime<Utc>) -> Self {
        let rows = events
            .into_iter()
            .map(|event| OutboxRow {
                event,
                attempts: 0,
                last_error: None,
                next_attempt_at: now,
                processed_at: None,
                failed_at: None,
            })
            .collect();
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    pub fn rows_handle(&self) -> Arc<Mutex<Vec<OutboxRow>>> {
        Arc::clone(&self.rows)
    }
}

impl OutboxRepository for MockOutboxRepo {
    async fn fetch_due(
        &self,
        limit: u64,
        now: DateTime<Utc>,
    ) -> Result<Vec<PendingOutboxEvent>, ApiError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| {
                row.processed_at.is_none() && row.failed_at.is_none() && row.next_attempt_at <= now
            })
            .take(limit as usize)
            .map(|row| PendingOutboxEvent {
                event: row.event.clone(),
                attempts: row.attempts,
            })
            .collect())
    }

    async fn mark_processed(&self, id: Uuid) -> Result<(), ApiError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.event.id == id) {
            row.processed_at = Some(Utc::now());
        }
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
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.event.id == id) {
            row.attempts = attempts;
            row.last_error = Some(error.to_owned());
            row.next_attempt_at = next_attempt_at;
            if permanent {
                row.failed_at = Some(Utc::now());
            }
        }
        Ok(())
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<(String, String, String)>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn working() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, String, String)>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), anyhow::Error> {
        if self.fail {
            anyhow::bail!("smtp relay refused connection");
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), subject.to_owned(), body.to_owned()));
        Ok(())
    }
}

// ── MockAssistant ────────────────────────────────────────────────────────────

pub enum MockAssistantBehavior {
    Reply(String),
    NotConfigured,
    UpstreamError,
}

pub struct MockAssistant {
    pub behavior: MockAssistantBehavior,
    pub calls: Arc<Mutex<u32>>,
}

impl MockAssistant {
    pub fn replying(reply: &str) -> Self {
        Self {
            behavior: MockAssistantBehavior::Reply(reply.to_owned()),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn not_configured() -> Self {
        Self {
            behavior: MockAssistantBehavior::NotConfigured,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: MockAssistantBehavior::UpstreamError,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn calls_handle(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.calls)
    }
}

impl AssistantPort for MockAssistant {
    async fn complete(&self, _message: &str) -> Result<String, ApiError> {
        *self.calls.lock().unwrap() += 1;
        match &self.behavior {
            MockAssistantBehavior::Reply(reply) => Ok(reply.clone()),
            MockAssistantBehavior::NotConfigured => Err(ApiError::AssistantUnavailable),
            MockAssistantBehavior::UpstreamError => Err(ApiError::Internal(anyhow::anyhow!(
                "chat completions returned 503"
            ))),
        }
    }
}
