//! Per-connection forwarding loop.
//!
//! Pushes frames from the bus to one subscriber and watches the socket for
//! the client going away. Clients never send data on the feed; anything
//! they do send is ignored.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use crate::domain::Frame;

/// Runs the read/write loop for a single WebSocket subscriber.
///
/// - Forwards every [`Frame`] from the [`broadcast::Receiver`] as a text
///   message.
/// - Ends on client close, read or send failure, or bus shutdown.
pub async fn run_connection(socket: WebSocket, mut frame_rx: broadcast::Receiver<Frame>) {
    let connection_id = uuid::Uuid::new_v4();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut forwarded: u64 = 0;

    tracing::info!(%connection_id, "feed subscriber connected");

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Text(_) | Message::Binary(_))) => {
                        tracing::debug!(%connection_id, "ignoring data sent by feed subscriber");
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::debug!(%connection_id, error = %err, "ws read failed");
                        break;
                    }
                }
            }
            // Frame from FrameBus
            frame = frame_rx.recv() => {
                match frame {
                    Ok(frame) => {
                        if ws_tx.send(Message::text(frame.to_string())).await.is_err() {
                            break;
                        }
                        forwarded += 1;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(%connection_id, lagged = n, "ws subscriber lagged behind frame bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
        }
    }

    tracing::info!(%connection_id, forwarded, "feed subscriber disconnected");
}
