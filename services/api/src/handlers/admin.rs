use axum::Json;
use axum::extract::{Path, State};
use axum::extract::rejection::JsonRejection;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use teamsync_domain::user::{Gender, Role};

use crate::domain::types::UserPatch;
use crate::error::ApiError;
use crate::identity::Identity;
use crate::state::AppState;
use crate::usecase::admin::{
    Actor, DeleteUserUseCase, ListUsersUseCase, SetLockUseCase, UpdateUserUseCase,
};

use super::UserResponse;
use super::auth::bad_body;

fn actor(identity: &Identity) -> Actor {
    Actor {
        user_id: identity.user_id,
        role: identity.role,
    }
}

// ── GET /api/admin/users ─────────────────────────────────────────────────────

pub async fn list_users(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute(actor(&identity)).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── PUT /api/admin/users/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub role: Option<Role>,
    pub contact_number: Option<String>,
}

pub async fn update_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(bad_body)?;
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
        audit: state.audit_repo(),
    };
    let user = usecase
        .execute(
            actor(&identity),
            id,
            UserPatch {
                full_name: body.full_name,
                company_id: body.company_id,
                email: body.email,
                dob: body.dob,
                gender: body.gender,
                role: body.role,
                contact_number: body.contact_number,
            },
        )
        .await?;
    Ok(Json(json!({
        "msg": "User updated successfully!",
        "user": UserResponse::from(user),
    })))
}

// ── DELETE /api/admin/users/{id} ─────────────────────────────────────────────

pub async fn delete_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
        audit: state.audit_repo(),
    };
    usecase.execute(actor(&identity), id).await?;
    Ok(Json(json!({ "msg": "User deleted successfully!" })))
}

// ── PUT /api/admin/users/{id}/terminate ──────────────────────────────────────

pub async fn terminate_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let usecase = SetLockUseCase {
        users: state.user_repo(),
        audit: state.audit_repo(),
    };
    let user = usecase.execute(actor(&identity), id, true).await?;
    Ok(Json(json!({
        "msg": "User account locked",
        "user": UserResponse::from(user),
    })))
}

// ── PUT /api/admin/users/{id}/unlock ─────────────────────────────────────────

pub async fn unlock_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let usecase = SetLockUseCase {
        users: state.user_repo(),
        audit: state.audit_repo(),
    };
    let user = usecase.execute(actor(&identity), id, false).await?;
    Ok(Json(json!({
        "msg": "User account unlocked",
        "user": UserResponse::from(user),
    })))
}
