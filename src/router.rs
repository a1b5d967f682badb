use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::converter::build_contents;
use crate::gemini::GenerativeClient;
use crate::models::{ChatTurnRequest, ChatTurnResponse, ErrorResponse};

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn GenerativeClient>,
    pub fallback_prompt: Option<String>,
}

/// `POST /api/chat`: normalize the transcript, make one Gemini call, map the
/// outcome to a status/body pair. Per-request errors never propagate past
/// this handler.
#[axum_macros::debug_handler]
pub async fn chat_turn(
    State(state): State<AppState>,
    Json(request): Json<ChatTurnRequest>,
) -> impl IntoResponse {
    debug!(
        "chat turn: {} history messages, prompt={}, image={}",
        request.history.len(),
        request.prompt.is_some(),
        request.image.is_some()
    );

    let contents = match build_contents(
        &request.history,
        request.prompt.as_deref(),
        request.image.as_deref(),
        state.fallback_prompt.as_deref(),
    ) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("rejecting chat turn: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Invalid image format".to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.client.generate(contents).await {
        Ok(text) => (StatusCode::OK, Json(ChatTurnResponse { response: text })).into_response(),
        Err(e) => {
            warn!("chat turn failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to get response from Gemini".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// `GET /`: liveness probe.
pub async fn index() -> &'static str {
    "Gemini chat relay is running"
}
