//! WebSocket layer: subscriber upgrade and per-connection frame forwarding.
//!
//! The WebSocket endpoint at `/` is a one-way feed: every frame published
//! on the [`crate::domain::FrameBus`] is pushed to every connected client.

pub mod connection;
pub mod handler;
