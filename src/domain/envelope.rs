//! The sendable message of the feed and its validating decoder.
//!
//! The wire shape is fixed:
//!
//! ```json
//! { "PointCloudImage": [[x, y, z], ...] }
//! ```
//!
//! [`Envelope::decode`] parses straight into the typed shape, so a payload
//! that is valid JSON but not an envelope (missing field, wrong point arity,
//! non-numeric coordinate) is rejected as [`DecodeError::Schema`] rather
//! than passed along half-formed.

use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use super::PointCloudImage;

/// Top-level message carried on the feed channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// The frame carried by this message.
    #[serde(rename = "PointCloudImage")]
    pub point_cloud_image: PointCloudImage,
}

impl Envelope {
    /// Wraps a frame in an envelope.
    #[must_use]
    pub const fn new(point_cloud_image: PointCloudImage) -> Self {
        Self { point_cloud_image }
    }

    /// Decodes a text payload.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Syntax`] if the payload is not well-formed
    /// JSON, or [`DecodeError::Schema`] if it is JSON of the wrong shape.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(raw).map_err(DecodeError::from)
    }

    /// Decodes a binary payload. Bytes that are not UTF-8 fail as
    /// [`DecodeError::Syntax`].
    ///
    /// # Errors
    ///
    /// Same as [`Envelope::decode`].
    pub fn decode_bytes(raw: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(raw).map_err(DecodeError::from)
    }

    /// Serializes the envelope to its wire form.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`]. Unreachable for `f64`
    /// coordinates: non-finite values are written as `null`, not rejected.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Borrows the carried frame.
    #[must_use]
    pub const fn image(&self) -> &PointCloudImage {
        &self.point_cloud_image
    }

    /// Consumes the envelope, returning the carried frame.
    #[must_use]
    pub fn into_image(self) -> PointCloudImage {
        self.point_cloud_image
    }
}

/// Why a payload could not be decoded into an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not well-formed JSON.
    #[error("malformed payload: {reason}")]
    Syntax {
        /// 1-based line of the failure.
        line: usize,
        /// 1-based column of the failure.
        column: usize,
        /// Human-readable reason.
        reason: String,
    },

    /// The payload is JSON but does not have the envelope shape.
    #[error("payload is not a PointCloudImage envelope: {reason}")]
    Schema {
        /// 1-based line of the failure.
        line: usize,
        /// 1-based column of the failure.
        column: usize,
        /// Human-readable reason, naming the offending field or type.
        reason: String,
    },
}

impl DecodeError {
    /// Short machine-readable kind, used as a structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "syntax",
            Self::Schema { .. } => "schema",
        }
    }

    /// Human-readable reason without the kind prefix.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Syntax { reason, .. } | Self::Schema { reason, .. } => reason,
        }
    }

    /// `(line, column)` where decoding stopped.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        match self {
            Self::Syntax { line, column, .. } | Self::Schema { line, column, .. } => {
                (*line, *column)
            }
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        let line = err.line();
        let column = err.column();
        let reason = err.to_string();
        match err.classify() {
            Category::Data => Self::Schema {
                line,
                column,
                reason,
            },
            // Io cannot occur when decoding from memory.
            Category::Syntax | Category::Eof | Category::Io => Self::Syntax {
                line,
                column,
                reason,
            },
        }
    }
}
