//! Message decoder/dispatcher.
//!
//! [`Dispatcher`] turns each [`ChannelEvent`] into exactly one [`Record`]
//! on its [`Sink`]. It holds no state between calls: every payload is
//! decoded independently and dropped after it is written.

use super::channel::{ChannelEvent, Payload};
use super::sink::{Record, Sink};
use crate::domain::Envelope;

/// Routes channel events to a sink.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher<S> {
    sink: S,
}

impl<S: Sink> Dispatcher<S> {
    /// Creates a dispatcher writing to `sink`.
    #[must_use]
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Borrows the sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Decodes a text payload and writes the frame, or the decode failure.
    pub fn handle(&self, raw: &str) {
        self.sink.write(into_record(Envelope::decode(raw)));
    }

    /// Decodes a binary payload and writes the frame, or the decode failure.
    pub fn handle_bytes(&self, raw: &[u8]) {
        self.sink.write(into_record(Envelope::decode_bytes(raw)));
    }

    /// Dispatches one channel event by kind.
    pub fn dispatch(&self, event: ChannelEvent) {
        match event {
            ChannelEvent::Opened => self.sink.write(Record::Opened),
            ChannelEvent::Message(Payload::Text(text)) => self.handle(&text),
            ChannelEvent::Message(Payload::Binary(bytes)) => self.handle_bytes(&bytes),
            ChannelEvent::Errored(reason) => self.sink.write(Record::ChannelError(reason)),
            ChannelEvent::Closed => self.sink.write(Record::Closed),
        }
    }
}

fn into_record(decoded: Result<Envelope, crate::domain::DecodeError>) -> Record {
    match decoded {
        Ok(envelope) => Record::PointCloud(envelope.into_image()),
        Err(err) => Record::DecodeFailed(err),
    }
}
