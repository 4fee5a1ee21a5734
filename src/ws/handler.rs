//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /` — Upgrade HTTP connection to a feed subscription.
///
/// The bus receiver is created before the upgrade completes, so a client
/// that has finished its handshake is guaranteed to see every frame
/// published afterwards.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let frame_rx = state.frame_bus.subscribe();

    ws.on_upgrade(move |socket| run_connection(socket, frame_rx))
}
