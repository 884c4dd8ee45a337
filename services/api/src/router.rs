use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use teamsync_core::health::{healthz, index, readyz};
use teamsync_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    admin::{delete_user, list_users, terminate_user, unlock_user, update_user},
    auth::{forgot_password, login, me, signup, verify_otp},
    support::support,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/verify-otp", post(verify_otp))
        // Admin
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}", put(update_user))
        .route("/api/admin/users/{id}", delete(delete_user))
        .route("/api/admin/users/{id}/terminate", put(terminate_user))
        .route("/api/admin/users/{id}/unlock", put(unlock_user))
        // Support chat
        .route("/api/support", post(support))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
