//! Shared application state injected into all Axum handlers.

use crate::domain::FrameBus;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Frame bus feeding every WebSocket subscriber.
    pub frame_bus: FrameBus,
}

impl AppState {
    /// Creates state around a frame bus.
    #[must_use]
    pub const fn new(frame_bus: FrameBus) -> Self {
        Self { frame_bus }
    }
}
