use axum::{routing::get, Router};

use crate::chat::ws::chat_ws;
use crate::state::AppState;

/// O chat sobe por WebSocket; a autenticação vai no query param `token`
/// (conexões sem token entram como visitantes anônimos).
pub fn create_chat_router() -> Router<AppState> {
    Router::new().route("/ws", get(chat_ws))
}
