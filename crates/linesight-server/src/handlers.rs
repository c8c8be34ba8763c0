use std::convert::Infallible;

use async_stream::stream;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Multipart, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use futures::{stream::BoxStream, StreamExt};
use linesight_types::{
    events::{FlushEvent, RelayEvent, RelayEventKind, RelayEventPayload},
    geo::{GroundPosition, OutagePoint, PixelPoint},
    LinesightError,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::{page, AppState};

pub(crate) async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render(&state.camera))
}

/// Uploader entry point: multipart form with a required `frame` part and an
/// optional `camera_coords` part holding a JSON `[x, y]` pair.
pub(crate) async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut frame: Option<Bytes> = None;
    let mut camera_coords: Option<GroundPosition> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                warn!("rejecting malformed upload body: {err}");
                return (StatusCode::BAD_REQUEST, "Malformed multipart body").into_response();
            }
        };
        let name = field.name().map(|name| name.to_string());
        match name.as_deref() {
            Some("frame") => match field.bytes().await {
                Ok(bytes) => frame = Some(bytes),
                Err(err) => {
                    warn!("rejecting unreadable frame part: {err}");
                    return (StatusCode::BAD_REQUEST, "Unreadable frame part").into_response();
                }
            },
            Some("camera_coords") => match field.text().await {
                Ok(text) => match serde_json::from_str::<[f64; 2]>(&text) {
                    Ok([x, y]) => camera_coords = Some(GroundPosition::new(x, y)),
                    Err(err) => warn!("ignoring malformed camera_coords {text:?}: {err}"),
                },
                Err(err) => warn!("ignoring unreadable camera_coords part: {err}"),
            },
            _ => {}
        }
    }

    let Some(frame) = frame else {
        return (StatusCode::BAD_REQUEST, "No frame part in request").into_response();
    };

    let bytes = frame.len();
    state.relay.set_frame(frame).await;
    state
        .journal
        .record(RelayEvent::new(
            RelayEventKind::FrameReceived,
            RelayEventPayload::Frame { bytes },
        ))
        .await;

    if let Some(position) = camera_coords {
        state.relay.set_camera_position(position).await;
        state
            .journal
            .record(RelayEvent::new(
                RelayEventKind::PositionUpdated,
                RelayEventPayload::Position(position),
            ))
            .await;
    }

    (StatusCode::OK, "Frame received").into_response()
}

/// Continuous `multipart/x-mixed-replace` stream of the latest frame.
///
/// Ticks on a fixed interval and re-emits whatever the relay currently
/// holds; before the first upload it simply stays silent rather than erroring.
pub(crate) async fn video_feed(State(state): State<AppState>) -> Response {
    let relay = state.relay.clone();
    let interval = state.stream_interval;
    let feed = stream! {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Some(frame) = relay.frame().await {
                let mut part = Vec::with_capacity(frame.len() + 64);
                part.extend_from_slice(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n");
                part.extend_from_slice(&frame.data);
                part.extend_from_slice(b"\r\n");
                yield Ok::<Bytes, Infallible>(Bytes::from(part));
            }
        }
    };

    (
        [
            (
                header::CONTENT_TYPE,
                "multipart/x-mixed-replace; boundary=frame",
            ),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(feed),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddPointRequest {
    x: f64,
    y: f64,
}

pub(crate) async fn add_point(
    State(state): State<AppState>,
    Json(request): Json<AddPointRequest>,
) -> Response {
    let pixel = PixelPoint::new(request.x, request.y);
    match state.relay.mark_point(pixel).await {
        Ok(point) => {
            state
                .journal
                .record(RelayEvent::new(
                    RelayEventKind::PointMarked,
                    RelayEventPayload::Point {
                        pixel,
                        ground: point.as_pair(),
                    },
                ))
                .await;
            Json(json!({ "status": "success", "point": point.as_pair() })).into_response()
        }
        Err(LinesightError::MissingCameraPosition) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "message": "No camera coords" })),
        )
            .into_response(),
        Err(err) => {
            error!("add_point failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// Flush: hand the accumulated points to the caller, clear the list, and
/// push the same batch to every websocket subscriber.
pub(crate) async fn send_outage(State(state): State<AppState>) -> Json<serde_json::Value> {
    let points = state.relay.flush_points().await;
    let pairs: Vec<[f64; 2]> = points.iter().map(OutagePoint::as_pair).collect();
    state
        .journal
        .record(RelayEvent::new(
            RelayEventKind::PointsFlushed,
            RelayEventPayload::Flush { count: pairs.len() },
        ))
        .await;
    if !pairs.is_empty() {
        state.flush.publish(FlushEvent::new(pairs.clone()));
    }
    Json(json!({ "points": pairs }))
}

/// Non-destructive peek at the pending list.
pub(crate) async fn peek_outage(State(state): State<AppState>) -> Json<serde_json::Value> {
    let pairs: Vec<[f64; 2]> = state
        .relay
        .peek_points()
        .await
        .iter()
        .map(OutagePoint::as_pair)
        .collect();
    Json(json!({ "points": pairs }))
}

pub(crate) async fn outage_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let flushes = state.flush.subscribe();
    ws.on_upgrade(move |socket| forward_flushes(socket, flushes))
}

async fn forward_flushes(mut socket: WebSocket, mut flushes: BoxStream<'static, FlushEvent>) {
    while let Some(event) = flushes.next().await {
        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(err) => {
                error!("failed to encode flush event: {err}");
                continue;
            }
        };
        if socket.send(Message::Text(payload)).await.is_err() {
            debug!("outage_ws subscriber went away");
            break;
        }
    }
}

pub(crate) async fn stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    let counters = state.journal.counters().await;
    let pending = state.relay.pending_points().await;
    let camera = state
        .relay
        .camera_position()
        .await
        .map(|position| [position.x, position.y]);
    Json(json!({
        "counters": counters,
        "pending_points": pending,
        "camera_position": camera,
        "frame_present": state.relay.frame().await.is_some(),
        "ws_subscribers": state.flush.subscriber_count(),
    }))
}
