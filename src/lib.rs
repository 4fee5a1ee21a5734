//! # pointcloud-feed
//!
//! Receive-only WebSocket listener for point-cloud frames, and the feed
//! server that broadcasts them.
//!
//! Each message on the feed is one JSON envelope:
//!
//! ```json
//! { "PointCloudImage": [[1, 2, 3], [4, 5, 6]] }
//! ```
//!
//! The listener decodes every message into a typed [`domain::Envelope`]
//! and writes exactly one record per channel event to a log sink: the
//! points on success, a diagnostic on a malformed payload.
//!
//! ## Architecture
//!
//! ```text
//! Publishers (HTTP POST /api/v1/frames)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── FrameBus (domain/)
//!     ├── WS Feed at / (ws/)
//!     │
//!     ▼
//! Listener (client/)
//!     ├── Channel: Opened | Message | Errored | Closed
//!     ├── Dispatcher: decode → Record
//!     └── Sink: tracing / memory
//! ```

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod telemetry;
pub mod ws;
