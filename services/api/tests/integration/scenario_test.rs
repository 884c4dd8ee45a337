//! Full account-lifecycle flow: signup, login, terminate, retry.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use uuid::Uuid;

use teamsync_domain::user::{Gender, Role};

use teamsync_api::error::ApiError;
use teamsync_api::usecase::admin::{Actor, SetLockUseCase};
use teamsync_api::usecase::login::{LoginInput, LoginUseCase};
use teamsync_api::usecase::signup::{SignupInput, SignupUseCase};

use crate::helpers::{MockAuditLog, MockUserRepo, TEST_JWT_SECRET};

#[tokio::test]
async fn signup_login_terminate_relogin() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();

    // Signup.
    let signup = SignupUseCase { users: repo };
    signup
        .execute(SignupInput {
            full_name: "A".to_owned(),
            company_id: "TS00001".to_owned(),
            dob: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            email: "a@x.com".to_owned(),
            gender: Gender::Male,
            role: Role::Employee,
            password: "Abcd123!".to_owned(),
            contact_number: "1234567890".to_owned(),
        })
        .await
        .unwrap();

    // A second signup with the same email but a different company ID conflicts.
    let conflict = signup
        .execute(SignupInput {
            full_name: "B".to_owned(),
            company_id: "TS00002".to_owned(),
            dob: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            email: "a@x.com".to_owned(),
            gender: Gender::Female,
            role: Role::Manager,
            password: "Efgh456!".to_owned(),
            contact_number: "0987654321".to_owned(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        conflict.into_response().status(),
        StatusCode::BAD_REQUEST
    );

    // Login succeeds with the stored role.
    let login = LoginUseCase {
        users: MockUserRepo {
            users: users.clone(),
        },
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let out = login
        .execute(LoginInput {
            email: Some("a@x.com".to_owned()),
            company_id: None,
            password: "Abcd123!".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(out.role, Role::Employee);
    assert!(!out.token.is_empty());

    // Admin terminates the account.
    let user_id = users.lock().unwrap()[0].id;
    let lock = SetLockUseCase {
        users: MockUserRepo {
            users: users.clone(),
        },
        audit: MockAuditLog::new(),
    };
    let locked = lock
        .execute(
            Actor {
                user_id: Uuid::new_v4(),
                role: Role::Admin,
            },
            user_id,
            true,
        )
        .await
        .unwrap();
    assert!(locked.locked);

    // The same credentials now answer 403.
    let retry = login
        .execute(LoginInput {
            email: Some("a@x.com".to_owned()),
            company_id: None,
            password: "Abcd123!".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(retry, ApiError::AccountLocked));
    assert_eq!(retry.into_response().status(), StatusCode::FORBIDDEN);
}
