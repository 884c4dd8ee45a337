//! Bearer-token helpers for integration tests.
//!
//! Protected handlers expect an `Authorization: Bearer <jwt>` header. In
//! tests, `TestAuth` signs a real token with the test secret so the full
//! validation path is exercised — no mock middleware needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use teamsync_auth_types::token::issue_access_token;
use teamsync_domain::user::Role;

/// Shared signing secret for tests.
pub const TEST_JWT_SECRET: &str = "teamsync-test-secret";

/// Configurable identity whose tokens are accepted by the test secret.
pub struct TestAuth {
    pub user_id: Uuid,
    pub role: Role,
}

impl TestAuth {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), Role::Admin)
    }

    pub fn employee() -> Self {
        Self::new(Uuid::new_v4(), Role::Employee)
    }

    /// A freshly signed bearer token for this identity.
    pub fn token(&self) -> String {
        let (token, _) = issue_access_token(self.user_id, self.role, TEST_JWT_SECRET)
            .expect("failed to sign test token");
        token
    }

    /// Headers as a client would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap(),
        );
        map
    }
}
