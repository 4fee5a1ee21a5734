//! Listener side of the feed: connect, decode, log.
//!
//! A [`Channel`] yields [`ChannelEvent`]s in delivery order and a
//! [`Dispatcher`] turns each one into a single [`Record`] on a [`Sink`].
//! [`run`] ties the two together.

pub mod channel;
pub mod dispatcher;
pub mod sink;

pub use channel::{Channel, ChannelEvent, Payload};
pub use dispatcher::Dispatcher;
pub use sink::{Level, MemorySink, Record, Sink, TracingSink};

/// Pulls events from `channel` and dispatches them until the channel has
/// closed. Returns the number of events dispatched.
pub async fn run<S: Sink>(channel: &mut Channel, dispatcher: &Dispatcher<S>) -> usize {
    let mut dispatched = 0;
    while let Some(event) = channel.next_event().await {
        dispatcher.dispatch(event);
        dispatched += 1;
    }
    tracing::debug!(url = channel.url(), dispatched, "listener finished");
    dispatched
}
