//! The listener's transport: one receive-only WebSocket connection exposed
//! as an ordered stream of [`ChannelEvent`]s.
//!
//! ```text
//! Pending ──connect ok──▶ Open ──text/binary──▶ Open
//!    │                     │ └──close frame / EOF──▶ Done
//!    └──connect err──▶ Failed ◀──read err──┘
//!                        └──────────────▶ Done
//! ```
//!
//! A connection always ends with exactly one [`ChannelEvent::Closed`], after
//! which [`Channel::next_event`] returns `None`. There is no reconnect.

use std::fmt;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// One raw inbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A text frame.
    Text(String),
    /// A binary frame; decoded from its bytes.
    Binary(Vec<u8>),
}

/// Lifecycle and data events produced by a [`Channel`], in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The connection was established.
    Opened,
    /// A data message arrived.
    Message(Payload),
    /// The transport failed. The reason is passed through verbatim.
    Errored(String),
    /// The connection is finished.
    Closed,
}

/// How long to wait for the peer to finish the closing handshake.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum State {
    Pending,
    Open(Box<Socket>),
    Failed,
    Done,
}

impl State {
    const fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Open(_) => "open",
            Self::Failed => "failed",
            Self::Done => "done",
        }
    }
}

/// A WebSocket client connection to the feed.
///
/// Nothing happens until the first call to [`Channel::next_event`], which
/// performs the handshake.
pub struct Channel {
    url: String,
    state: State,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("url", &self.url)
            .field("state", &self.state.name())
            .finish()
    }
}

impl Channel {
    /// Creates an unopened channel for `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: State::Pending,
        }
    }

    /// The address this channel connects to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns `true` once the channel has emitted [`ChannelEvent::Closed`].
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.state, State::Done)
    }

    /// Waits for the next event.
    ///
    /// Control frames (ping, pong, raw frames) are consumed without
    /// producing an event; pongs are answered by the WebSocket library.
    /// Returns `None` after [`ChannelEvent::Closed`] has been delivered.
    ///
    /// Not cancel safe: dropping the future while it waits leaves the
    /// channel finished.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Pending => match connect_async(self.url.as_str()).await {
                    Ok((socket, response)) => {
                        tracing::debug!(
                            url = %self.url,
                            status = %response.status(),
                            "websocket handshake complete"
                        );
                        self.state = State::Open(Box::new(socket));
                        return Some(ChannelEvent::Opened);
                    }
                    Err(err) => {
                        self.state = State::Failed;
                        return Some(ChannelEvent::Errored(err.to_string()));
                    }
                },
                State::Open(mut socket) => match socket.next().await {
                    Some(Ok(Message::Text(text))) => {
                        self.state = State::Open(socket);
                        let text = text.as_str().to_owned();
                        return Some(ChannelEvent::Message(Payload::Text(text)));
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        self.state = State::Open(socket);
                        return Some(ChannelEvent::Message(Payload::Binary(bytes.to_vec())));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::debug!(url = %self.url, ?frame, "close frame received");
                        finish_close(&mut socket).await;
                        return Some(ChannelEvent::Closed);
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {
                        self.state = State::Open(socket);
                    }
                    Some(Err(err)) => {
                        self.state = State::Failed;
                        return Some(ChannelEvent::Errored(err.to_string()));
                    }
                    None => return Some(ChannelEvent::Closed),
                },
                State::Failed => return Some(ChannelEvent::Closed),
                State::Done => return None,
            }
        }
    }
}

/// Reads past a received close frame so the queued close reply is flushed,
/// until the peer drops the connection or [`CLOSE_TIMEOUT`] elapses.
async fn finish_close(socket: &mut Socket) {
    let drain = async {
        while let Some(Ok(_)) = socket.next().await {}
    };
    if tokio::time::timeout(CLOSE_TIMEOUT, drain).await.is_err() {
        tracing::debug!("peer did not finish the closing handshake in time");
    }
}
