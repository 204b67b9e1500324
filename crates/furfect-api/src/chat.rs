use axum::{
    Json,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
};

use furfect_gateway::connection;
use furfect_gateway::relay;
use furfect_types::events::ChatMessagePayload;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        connection::handle_connection(socket, state.registry.clone(), state.relay.clone())
    })
}

/// Persisted chat history, oldest first.
pub async fn get_messages(State(state): State<AppState>) -> ApiResult<Json<Vec<ChatMessagePayload>>> {
    let messages = relay::history(&state.db).await?;
    Ok(Json(messages))
}
