//! Frame publication DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body of a successful frame publication.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublishResponse {
    /// Number of subscribers the frame was handed to.
    pub delivered: usize,
    /// Number of points in the published frame.
    pub points: usize,
    /// Server time the frame was accepted.
    pub published_at: DateTime<Utc>,
}
