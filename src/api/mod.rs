//! HTTP surface of the feed server: REST routes, the WebSocket feed route,
//! OpenAPI document, and the middleware stack.
//!
//! REST endpoints are mounted under `/api/v1`; the feed itself is the
//! WebSocket upgrade at `/`.

pub mod dto;
pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::config::ServerConfig;
use crate::ws::handler::ws_handler;

/// OpenAPI document for the REST endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "pointcloud-feed", description = "Point-cloud frame feed server"),
    paths(handlers::frames::publish_frame, handlers::system::health_handler),
    tags(
        (name = "Frames", description = "Frame publication"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the full application: REST routes, the WebSocket feed at `/`,
/// Swagger UI (with the `swagger-ui` feature), and middleware.
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .merge(build_router())
        .route("/", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(DefaultBodyLimit::max(config.max_frame_bytes))
        .layer(request_timeout(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn request_timeout(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::new(timeout)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::api::dto::PublishResponse;
    use crate::domain::FrameBus;

    fn app(bus: &FrameBus) -> Router {
        let config = tokio_test::assert_ok!(ServerConfig::from_lookup(|_| None));
        build_app(AppState::new(bus.clone()), &config)
    }

    async fn post_frame(app: Router, body: &'static str) -> (StatusCode, serde_json::Value) {
        let request = tokio_test::assert_ok!(
            Request::builder()
                .method("POST")
                .uri("/api/v1/frames")
                .header("content-type", "application/json")
                .body(Body::from(body))
        );
        let response = tokio_test::assert_ok!(app.oneshot(request).await);
        let status = response.status();
        let bytes = tokio_test::assert_ok!(axum::body::to_bytes(response.into_body(), usize::MAX).await);
        let json: serde_json::Value = tokio_test::assert_ok!(serde_json::from_slice(&bytes));
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_subscribers() {
        let bus = FrameBus::new(4);
        let _rx = bus.subscribe();
        let request = tokio_test::assert_ok!(Request::builder().uri("/health").body(Body::empty()));
        let response = tokio_test::assert_ok!(app(&bus).oneshot(request).await);
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = tokio_test::assert_ok!(axum::body::to_bytes(response.into_body(), usize::MAX).await);
        let json: serde_json::Value = tokio_test::assert_ok!(serde_json::from_slice(&bytes));
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["subscribers"], 1);
    }

    #[tokio::test]
    async fn valid_frame_is_accepted_and_broadcast() {
        let bus = FrameBus::new(4);
        let mut rx = bus.subscribe();

        let (status, json) =
            post_frame(app(&bus), r#"{"PointCloudImage":[[1,2,3],[4,5,6]]}"#).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let response: PublishResponse = tokio_test::assert_ok!(serde_json::from_value(json));
        assert_eq!(response.delivered, 1);
        assert_eq!(response.points, 2);

        let frame = tokio_test::assert_ok!(rx.try_recv());
        assert_eq!(&*frame, r#"{"PointCloudImage":[[1.0,2.0,3.0],[4.0,5.0,6.0]]}"#);
    }

    #[tokio::test]
    async fn malformed_frame_is_rejected_with_syntax_code() {
        let bus = FrameBus::new(4);
        let mut rx = bus.subscribe();

        let (status, json) = post_frame(app(&bus), "not json at all").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], 1001);
        assert_eq!(json["error"]["details"], "syntax");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn wrong_shape_is_rejected_with_schema_code() {
        let bus = FrameBus::new(4);
        let (status, json) = post_frame(app(&bus), r#"{"PointCloudImage":[[1,2]]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], 1002);
    }

    #[tokio::test]
    async fn plain_get_on_feed_route_is_not_upgraded() {
        let bus = FrameBus::new(4);
        let request = tokio_test::assert_ok!(Request::builder().uri("/").body(Body::empty()));
        let response = tokio_test::assert_ok!(app(&bus).oneshot(request).await);
        assert!(response.status().is_client_error());
        assert_eq!(bus.receiver_count(), 0);
    }

    #[test]
    fn openapi_lists_frame_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/frames"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
