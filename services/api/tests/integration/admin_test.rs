use uuid::Uuid;

use teamsync_domain::user::Role;

use teamsync_api::domain::types::UserPatch;
use teamsync_api::error::ApiError;
use teamsync_api::usecase::admin::{
    Actor, DeleteUserUseCase, ListUsersUseCase, SetLockUseCase, UpdateUserUseCase,
};

use crate::helpers::{MockAuditLog, MockUserRepo, test_user};

fn admin() -> Actor {
    Actor {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
    }
}

fn employee() -> Actor {
    Actor {
        user_id: Uuid::new_v4(),
        role: Role::Employee,
    }
}

#[tokio::test]
async fn non_admin_cannot_list_users() {
    let usecase = ListUsersUseCase {
        users: MockUserRepo::new(vec![test_user()]),
    };
    let result = usecase.execute(employee()).await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
}

#[tokio::test]
async fn admin_lists_all_users() {
    let usecase = ListUsersUseCase {
        users: MockUserRepo::new(vec![test_user()]),
    };
    let users = usecase.execute(admin()).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn non_admin_mutations_are_rejected_and_leave_state_untouched() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let audit = MockAuditLog::new();
    let audit_events = audit.events_handle();

    let usecase = SetLockUseCase { users, audit };
    let result = usecase.execute(employee(), user.id, true).await;

    assert!(matches!(result, Err(ApiError::Forbidden)));
    assert!(!users_handle.lock().unwrap()[0].locked);
    assert!(audit_events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn terminate_locks_idempotently_and_audits_each_call() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let audit = MockAuditLog::new();
    let audit_events = audit.events_handle();
    let usecase = SetLockUseCase { users, audit };
    let actor = admin();

    let locked = usecase.execute(actor, user.id, true).await.unwrap();
    assert!(locked.locked);

    // Re-locking an already-locked account is a state no-op, not an error.
    let still_locked = usecase.execute(actor, user.id, true).await.unwrap();
    assert!(still_locked.locked);

    let events = audit_events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.action == "user_locked"));
    assert_eq!(events[0].actor_id, actor.user_id);
    assert_eq!(events[0].target_id, user.id);
}

#[tokio::test]
async fn unlock_restores_authentication_state() {
    let mut user = test_user();
    user.locked = true;
    let users = MockUserRepo::new(vec![user.clone()]);
    let audit = MockAuditLog::new();
    let audit_events = audit.events_handle();
    let usecase = SetLockUseCase { users, audit };

    let unlocked = usecase.execute(admin(), user.id, false).await.unwrap();
    assert!(!unlocked.locked);
    assert_eq!(audit_events.lock().unwrap()[0].action, "user_unlocked");
}

#[tokio::test]
async fn lock_of_unknown_user_is_not_found() {
    let usecase = SetLockUseCase {
        users: MockUserRepo::empty(),
        audit: MockAuditLog::new(),
    };
    let result = usecase.execute(admin(), Uuid::new_v4(), true).await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

#[tokio::test]
async fn update_changes_role_and_records_changed_fields() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let audit = MockAuditLog::new();
    let audit_events = audit.events_handle();
    let usecase = UpdateUserUseCase { users, audit };

    let updated = usecase
        .execute(
            admin(),
            user.id,
            UserPatch {
                role: Some(Role::Manager),
                contact_number: Some("0987654321".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.role, Role::Manager);
    assert_eq!(updated.contact_number, "0987654321");

    let events = audit_events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, "user_updated");
    let fields = events[0].detail["fields"].as_array().unwrap();
    assert!(fields.iter().any(|f| f == "role"));
    assert!(fields.iter().any(|f| f == "contactNumber"));
}

#[tokio::test]
async fn update_validates_fields_like_signup() {
    let user = test_user();
    let usecase = UpdateUserUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        audit: MockAuditLog::new(),
    };

    let bad_contact = usecase
        .execute(
            admin(),
            user.id,
            UserPatch {
                contact_number: Some("123".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(bad_contact, Err(ApiError::Validation(_))));

    let bad_company = usecase
        .execute(
            admin(),
            user.id,
            UserPatch {
                company_id: Some("nope".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(bad_company, Err(ApiError::Validation(_))));

    let empty = usecase.execute(admin(), user.id, UserPatch::default()).await;
    assert!(matches!(empty, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn update_to_taken_email_is_a_duplicate() {
    let user_a = test_user();
    let mut user_b = test_user();
    user_b.id = Uuid::now_v7();
    user_b.email = "b@x.com".to_owned();
    user_b.company_id = "TS00002".to_owned();

    let usecase = UpdateUserUseCase {
        users: MockUserRepo::new(vec![user_a.clone(), user_b.clone()]),
        audit: MockAuditLog::new(),
    };

    let result = usecase
        .execute(
            admin(),
            user_b.id,
            UserPatch {
                email: Some(user_a.email.clone()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::DuplicateUser)));
}

#[tokio::test]
async fn delete_removes_exactly_once() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let audit = MockAuditLog::new();
    let audit_events = audit.events_handle();
    let usecase = DeleteUserUseCase { users, audit };

    usecase.execute(admin(), user.id).await.unwrap();
    assert!(users_handle.lock().unwrap().is_empty());
    assert_eq!(audit_events.lock().unwrap()[0].action, "user_deleted");

    let again = usecase.execute(admin(), user.id).await;
    assert!(matches!(again, Err(ApiError::UserNotFound)));
    // No audit entry for the failed attempt.
    assert_eq!(audit_events.lock().unwrap().len(), 1);
}
