use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::support::SupportUseCase;

const NOT_CONFIGURED_REPLY: &str =
    "Sorry, the AI support system is not properly configured. Please contact admin directly.";
const FALLBACK_REPLY: &str = "I apologize, but I am temporarily unable to process your request. \
     Please try again or contact admin if the issue persists.";

#[derive(Deserialize)]
pub struct SupportRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct SupportResponse {
    pub reply: String,
}

// ── POST /api/support ────────────────────────────────────────────────────────

/// Unlike the rest of the API, failures here still answer with a `reply`
/// the chat widget can show, not a bare error body.
pub async fn support(
    State(state): State<AppState>,
    body: Result<Json<SupportRequest>, JsonRejection>,
) -> Result<Json<SupportResponse>, (StatusCode, Json<SupportResponse>)> {
    let message = body.map(|Json(b)| b.message).unwrap_or_default();
    let usecase = SupportUseCase {
        assistant: state.assistant.clone(),
    };
    match usecase.execute(&message).await {
        Ok(reply) => Ok(Json(SupportResponse { reply })),
        Err(ApiError::AssistantUnavailable) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SupportResponse {
                reply: NOT_CONFIGURED_REPLY.to_owned(),
            }),
        )),
        Err(e) => {
            tracing::error!(error = %e, "support assistant call failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SupportResponse {
                    reply: FALLBACK_REPLY.to_owned(),
                }),
            ))
        }
    }
}
