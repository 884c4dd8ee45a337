use sea_orm::entity::prelude::*;

/// User account record.
///
/// `gender` and `role` store the wire strings defined in
/// `teamsync_domain::user`; `email` and `company_id` carry unique indexes
/// that back the duplicate-signup conflict.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub company_id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub dob: Date,
    pub gender: String,
    pub role: String,
    pub password_hash: String,
    pub contact_number: String,
    pub locked: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
