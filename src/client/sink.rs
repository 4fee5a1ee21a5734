//! Log sinks for dispatched records.
//!
//! Every channel event ends in exactly one [`Record`] written to a
//! [`Sink`]. A record is either informational (lifecycle notices and decoded
//! frames) or diagnostic (decode failures and channel errors), see
//! [`Record::level`].

use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{DecodeError, PointCloudImage};

/// Label attached to a decoded frame.
pub const POINT_CLOUD_LABEL: &str = "Received PointCloudImage data";
/// Label attached to a payload that failed to decode.
pub const DECODE_FAILURE_LABEL: &str = "Failed to parse WebSocket message.";
/// Label attached to the channel-opened notice.
pub const OPENED_LABEL: &str = "WebSocket connection opened.";
/// Label attached to the channel-closed notice.
pub const CLOSED_LABEL: &str = "WebSocket connection closed.";
/// Label attached to a transport error.
pub const CHANNEL_ERROR_LABEL: &str = "WebSocket error";

/// Which output a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Normal operation.
    Info,
    /// Something failed.
    Diagnostic,
}

/// One entry written to a [`Sink`].
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// The channel opened.
    Opened,
    /// A payload decoded into a frame.
    PointCloud(PointCloudImage),
    /// A payload could not be decoded and was dropped.
    DecodeFailed(DecodeError),
    /// The transport reported an error, verbatim.
    ChannelError(String),
    /// The channel closed.
    Closed,
}

impl Record {
    /// Informational or diagnostic.
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::Opened | Self::PointCloud(_) | Self::Closed => Level::Info,
            Self::DecodeFailed(_) | Self::ChannelError(_) => Level::Diagnostic,
        }
    }

    /// The fixed descriptive label of this record.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Opened => OPENED_LABEL,
            Self::PointCloud(_) => POINT_CLOUD_LABEL,
            Self::DecodeFailed(_) => DECODE_FAILURE_LABEL,
            Self::ChannelError(_) => CHANNEL_ERROR_LABEL,
            Self::Closed => CLOSED_LABEL,
        }
    }
}

/// Consumer of dispatched records.
pub trait Sink {
    /// Writes one record. Must not fail.
    fn write(&self, record: Record);
}

impl<T: Sink + ?Sized> Sink for &T {
    fn write(&self, record: Record) {
        (**self).write(record);
    }
}

impl<T: Sink + ?Sized> Sink for Arc<T> {
    fn write(&self, record: Record) {
        (**self).write(record);
    }
}

/// Writes records as `tracing` events: informational records at `INFO`,
/// diagnostic ones at `ERROR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn write(&self, record: Record) {
        let label = record.label();
        match record {
            Record::Opened | Record::Closed => tracing::info!("{label}"),
            Record::PointCloud(image) => {
                tracing::info!(points = image.len(), cloud = %image, "{label}");
            }
            Record::DecodeFailed(err) => {
                let (line, column) = err.position();
                tracing::error!(kind = err.kind(), line, column, error = %err, "{label}");
            }
            Record::ChannelError(reason) => tracing::error!(error = %reason, "{label}"),
        }
    }
}

/// Keeps every record in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records written so far.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.lock().clone()
    }

    /// Snapshot of the records at `level`.
    #[must_use]
    pub fn records_at(&self, level: Level) -> Vec<Record> {
        self.lock()
            .iter()
            .filter(|r| r.level() == level)
            .cloned()
            .collect()
    }

    /// Number of records written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Record>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for MemorySink {
    fn write(&self, record: Record) {
        self.lock().push(record);
    }
}
