pub mod admin;
pub mod auth;
pub mod support;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use teamsync_domain::user::{Gender, Role};

use crate::domain::types::User;

/// User record as returned to clients. The password hash never appears.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    #[serde(rename = "companyID")]
    pub company_id: String,
    pub email: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub role: Role,
    pub contact_number: String,
    pub locked: bool,
    #[serde(serialize_with = "teamsync_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            company_id: user.company_id,
            email: user.email,
            dob: user.dob,
            gender: user.gender,
            role: user.role,
            contact_number: user.contact_number,
            locked: user.locked,
            created_at: user.created_at,
        }
    }
}
