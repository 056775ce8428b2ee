use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use super::extract::ApiJson;
use crate::chat::ChatSession;
use crate::models::{AppState, ChatRequest, ChatTurnResponse};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(post_chat))
        .with_state(state)
}

/// One stateless chat turn: the caller sends the dataset with every question, and may
/// name the template to apply if the question opens the picker.
pub async fn post_chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> AppResult<Json<ChatTurnResponse>> {
    info!(rows = request.data.len(), "Received chat question");

    let mut session = ChatSession::new(request.data)?;
    let mut messages = session
        .ask(&request.question, state.backend.as_ref())
        .await
        .to_vec();
    if let (true, Some(template)) = (session.is_template_picker_open(), request.template) {
        messages.extend_from_slice(session.select_template(template));
    }

    Ok(Json(ChatTurnResponse {
        messages,
        view: session.view().clone(),
        template_picker: session.is_template_picker_open(),
    }))
}
