//! Frame publication endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::PublishResponse;
use crate::app_state::AppState;
use crate::domain::Envelope;
use crate::error::{ErrorResponse, FeedError};

/// `POST /frames` — Broadcast one point-cloud frame to all subscribers.
///
/// The body is validated with the same decoder the listener uses, so only
/// well-formed envelopes ever reach the feed.
///
/// # Errors
///
/// Returns [`FeedError::Decode`] if the body is not a valid envelope.
#[utoipa::path(
    post,
    path = "/api/v1/frames",
    tag = "Frames",
    summary = "Publish a frame",
    description = "Validates a PointCloudImage envelope and broadcasts it to every WebSocket subscriber of the feed.",
    request_body(
        content = String,
        content_type = "application/json",
        description = "Envelope: {\"PointCloudImage\": [[x, y, z], ...]}"
    ),
    responses(
        (status = 202, description = "Frame accepted", body = PublishResponse),
        (status = 400, description = "Body is not a valid envelope", body = ErrorResponse),
    )
)]
pub async fn publish_frame(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, FeedError> {
    let envelope = Envelope::decode_bytes(&body).inspect_err(|err| {
        tracing::debug!(kind = err.kind(), error = %err, "rejected frame");
    })?;
    let points = envelope.image().len();
    let delivered = state.frame_bus.publish(&envelope)?;

    tracing::debug!(points, delivered, "frame published");

    Ok((
        StatusCode::ACCEPTED,
        Json(PublishResponse {
            delivered,
            points,
            published_at: Utc::now(),
        }),
    ))
}

/// Frame routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/frames", post(publish_frame))
}
