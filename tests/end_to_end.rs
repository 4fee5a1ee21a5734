//! End-to-end tests: a live feed server on a loopback port and the
//! listener channel connected to it.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use pointcloud_feed::api;
use pointcloud_feed::app_state::AppState;
use pointcloud_feed::client::{self, Channel, ChannelEvent, Dispatcher, Level, MemorySink, Record};
use pointcloud_feed::config::ServerConfig;
use pointcloud_feed::domain::{DecodeError, FrameBus, Point, PointCloudImage};
use tokio::sync::oneshot;

const STEP: Duration = Duration::from_secs(5);

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio_test::assert_ok!(tokio::net::TcpListener::bind("127.0.0.1:0").await);
    let addr = tokio_test::assert_ok!(listener.local_addr());
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            panic!("test server failed: {err}");
        }
    });
    addr
}

async fn start_feed_server() -> SocketAddr {
    let config = tokio_test::assert_ok!(ServerConfig::from_lookup(|_| None));
    serve(api::build_app(AppState::new(FrameBus::new(16)), &config)).await
}

async fn next(channel: &mut Channel) -> ChannelEvent {
    match tokio::time::timeout(STEP, channel.next_event()).await {
        Ok(Some(event)) => event,
        Ok(None) => panic!("channel finished unexpectedly"),
        Err(_) => panic!("timed out waiting for channel event"),
    }
}

async fn publish(addr: SocketAddr, body: &'static str) -> (reqwest::StatusCode, serde_json::Value) {
    let response = tokio_test::assert_ok!(
        reqwest::Client::new()
            .post(format!("http://{addr}/api/v1/frames"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
    );
    let status = response.status();
    let json: serde_json::Value = tokio_test::assert_ok!(response.json().await);
    (status, json)
}

#[tokio::test]
async fn published_frame_reaches_listener_sink() {
    let addr = start_feed_server().await;
    let mut channel = Channel::new(format!("ws://{addr}/"));
    let dispatcher = Dispatcher::new(MemorySink::new());

    let opened = next(&mut channel).await;
    assert_eq!(opened, ChannelEvent::Opened);
    dispatcher.dispatch(opened);

    let (status, json) = publish(addr, r#"{"PointCloudImage":[[1,2,3],[4,5,6]]}"#).await;
    assert_eq!(status, reqwest::StatusCode::ACCEPTED);
    assert_eq!(json["delivered"], 1);
    assert_eq!(json["points"], 2);

    dispatcher.dispatch(next(&mut channel).await);

    assert_eq!(
        dispatcher.sink().records(),
        vec![
            Record::Opened,
            Record::PointCloud(PointCloudImage::from(vec![
                Point::new(1.0, 2.0, 3.0),
                Point::new(4.0, 5.0, 6.0),
            ])),
        ]
    );
}

#[tokio::test]
async fn frames_arrive_in_publish_order() {
    let addr = start_feed_server().await;
    let mut channel = Channel::new(format!("ws://{addr}/"));
    assert_eq!(next(&mut channel).await, ChannelEvent::Opened);

    publish(addr, r#"{"PointCloudImage":[[1,1,1]]}"#).await;
    publish(addr, r#"{"PointCloudImage":[]}"#).await;
    publish(addr, r#"{"PointCloudImage":[[3,3,3],[2,2,2]]}"#).await;

    let dispatcher = Dispatcher::new(MemorySink::new());
    for _ in 0..3 {
        dispatcher.dispatch(next(&mut channel).await);
    }

    let sizes: Vec<usize> = dispatcher
        .sink()
        .records()
        .iter()
        .map(|r| match r {
            Record::PointCloud(image) => image.len(),
            other => panic!("unexpected record {other:?}"),
        })
        .collect();
    assert_eq!(sizes, vec![1, 0, 2]);
}

#[tokio::test]
async fn rejected_frame_is_not_broadcast() {
    let addr = start_feed_server().await;
    let mut channel = Channel::new(format!("ws://{addr}/"));
    assert_eq!(next(&mut channel).await, ChannelEvent::Opened);

    let (status, json) = publish(addr, "{}").await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], 1002);

    publish(addr, r#"{"PointCloudImage":[[0,0,0]]}"#).await;

    let dispatcher = Dispatcher::new(MemorySink::new());
    dispatcher.dispatch(next(&mut channel).await);
    assert_eq!(
        dispatcher.sink().records(),
        vec![Record::PointCloud(PointCloudImage::from(vec![Point::new(0.0, 0.0, 0.0)]))]
    );
}

#[tokio::test]
async fn health_counts_connected_listeners() {
    let addr = start_feed_server().await;
    let mut channel = Channel::new(format!("ws://{addr}/"));
    assert_eq!(next(&mut channel).await, ChannelEvent::Opened);

    let response = tokio_test::assert_ok!(reqwest::get(format!("http://{addr}/health")).await);
    let json: serde_json::Value = tokio_test::assert_ok!(response.json().await);
    assert_eq!(json["subscribers"], 1);
}

async fn scripted_feed(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(|mut socket| async move {
        let script = [
            Message::text("not json at all"),
            Message::text("{}"),
            Message::Binary(Bytes::from_static(br#"{"PointCloudImage":[[7,8,9]]}"#)),
            Message::Close(None),
        ];
        for msg in script {
            if socket.send(msg).await.is_err() {
                return;
            }
        }
    })
}

#[tokio::test]
async fn listener_logs_every_event_of_a_session() {
    let addr = serve(Router::new().route("/", get(scripted_feed))).await;
    let mut channel = Channel::new(format!("ws://{addr}/"));
    let dispatcher = Dispatcher::new(MemorySink::new());

    let dispatched = tokio_test::assert_ok!(
        tokio::time::timeout(STEP, client::run(&mut channel, &dispatcher)).await
    );
    assert_eq!(dispatched, 5);

    let records = dispatcher.sink().records();
    let [
        Record::Opened,
        Record::DecodeFailed(DecodeError::Syntax { .. }),
        Record::DecodeFailed(DecodeError::Schema { .. }),
        Record::PointCloud(image),
        Record::Closed,
    ] = records.as_slice()
    else {
        panic!("unexpected session log: {records:?}");
    };
    assert_eq!(image.points(), &[Point::new(7.0, 8.0, 9.0)]);
    assert_eq!(dispatcher.sink().records_at(Level::Diagnostic).len(), 2);
    assert!(channel.is_finished());
}

#[tokio::test]
async fn listener_answers_server_close() {
    let (reply_tx, reply_rx) = oneshot::channel::<String>();
    let reply_tx = Arc::new(Mutex::new(Some(reply_tx)));
    let app = Router::new().route(
        "/",
        get(move |ws: WebSocketUpgrade| {
            let reply_tx = reply_tx
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            async move {
                ws.on_upgrade(move |mut socket| async move {
                    if socket.send(Message::Close(None)).await.is_err() {
                        return;
                    }
                    let seen = match socket.recv().await {
                        Some(Ok(Message::Close(_))) => "close".to_string(),
                        other => format!("{other:?}"),
                    };
                    if let Some(tx) = reply_tx {
                        let _ = tx.send(seen);
                    }
                })
            }
        }),
    );
    let addr = serve(app).await;

    let mut channel = Channel::new(format!("ws://{addr}/"));
    let dispatcher = Dispatcher::new(MemorySink::new());
    let dispatched = tokio_test::assert_ok!(
        tokio::time::timeout(STEP, client::run(&mut channel, &dispatcher)).await
    );
    assert_eq!(dispatched, 2);
    assert_eq!(dispatcher.sink().records(), vec![Record::Opened, Record::Closed]);

    let seen = tokio_test::assert_ok!(tokio::time::timeout(STEP, reply_rx).await);
    assert_eq!(tokio_test::assert_ok!(seen), "close");
}
