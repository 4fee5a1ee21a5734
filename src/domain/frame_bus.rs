//! Broadcast channel for outgoing point-cloud frames.
//!
//! [`FrameBus`] wraps a [`tokio::sync::broadcast`] channel. Each published
//! [`Envelope`] is serialized once and every WebSocket subscriber receives
//! the same shared [`Frame`].

use std::sync::Arc;

use tokio::sync::broadcast;

use super::Envelope;
use crate::error::FeedError;

/// One serialized envelope, shared between all subscribers.
pub type Frame = Arc<str>;

/// Broadcast bus for [`Frame`]s.
///
/// When the ring buffer is full, the oldest frames are dropped for lagging
/// receivers.
#[derive(Debug, Clone)]
pub struct FrameBus {
    sender: broadcast::Sender<Frame>,
}

impl FrameBus {
    /// Creates a new `FrameBus` with the given channel capacity. A capacity
    /// of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Serializes `envelope` and publishes it to all subscribers.
    ///
    /// Returns the number of receivers the frame was delivered to. With no
    /// receivers the frame is dropped and `0` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Internal`] if the envelope cannot be serialized.
    pub fn publish(&self, envelope: &Envelope) -> Result<usize, FeedError> {
        let json = envelope
            .to_json()
            .map_err(|e| FeedError::Internal(format!("frame serialization failed: {e}")))?;
        Ok(self.publish_frame(Frame::from(json)))
    }

    /// Publishes an already serialized frame.
    pub fn publish_frame(&self, frame: Frame) -> usize {
        self.sender.send(frame).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future frames.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
