use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bridgette_common::ChatEvent;
use tracing::Instrument;

use crate::AppState;

/// POST /chat/events - Google Chat event webhook
async fn chat_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<ChatEvent>,
) -> Response {
    let event_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat_event", %event_id, event_type = %event.event_type);

    tracing::debug!(
        parent: &span,
        "Received event: {}",
        serde_json::to_string(&event).unwrap_or_default()
    );

    match state.bot.handle_event(&event).instrument(span).await {
        Some(message) => Json(message).into_response(),
        // The platform expects no reply body for this event.
        None => StatusCode::OK.into_response(),
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat/events", post(chat_event))
        .with_state(state)
}
