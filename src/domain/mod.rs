//! Domain layer: point-cloud types, the wire envelope, and frame broadcast.
//!
//! This module contains the model shared by both sides of the feed: the
//! [`Point`] and [`PointCloudImage`] data types, the [`Envelope`] that
//! carries them on the wire together with its validating decoder, and the
//! [`FrameBus`] the server uses to fan frames out to subscribers.

pub mod envelope;
pub mod frame_bus;
pub mod point;

pub use envelope::{DecodeError, Envelope};
pub use frame_bus::{Frame, FrameBus};
pub use point::{Point, PointCloudImage};
