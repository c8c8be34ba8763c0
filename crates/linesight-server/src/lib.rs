//! HTTP surface of the relay: frame upload, live MJPEG feed, operator click
//! capture, and outage-point flushing over both HTTP and websocket.

mod handlers;
mod page;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use linesight_ops::EventJournal;
use linesight_relay::{FlushBroadcaster, RelayState};
use linesight_types::{
    config::{CameraConfig, LinesightConfig, ServerConfig},
    LinesightError, Result,
};
use tracing::info;

/// Uploaded frames are complete JPEGs; allow bodies well past the axum
/// default of 2 MiB.
const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Shared handler context.
#[derive(Clone)]
pub struct AppState {
    pub relay: RelayState,
    pub flush: FlushBroadcaster,
    pub journal: EventJournal,
    pub stream_interval: Duration,
    pub camera: CameraConfig,
}

impl AppState {
    pub fn new(
        relay: RelayState,
        flush: FlushBroadcaster,
        journal: EventJournal,
        config: &LinesightConfig,
    ) -> Self {
        Self {
            relay,
            flush,
            journal,
            stream_interval: Duration::from_millis(config.server.stream_interval_ms),
            camera: config.camera.clone(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/upload", post(handlers::upload))
        .route("/video_feed", get(handlers::video_feed))
        .route("/add_point", post(handlers::add_point))
        .route(
            "/send_outage",
            post(handlers::send_outage).get(handlers::peek_outage),
        )
        .route("/outage_ws", get(handlers::outage_ws))
        .route("/stats", get(handlers::stats))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|err| server_error(format!("failed to bind {addr}: {err}")))?;
    info!("Relay listening on http://{addr}");
    axum::serve(listener, create_router(state))
        .await
        .map_err(|err| server_error(format!("server error: {err}")))
}

pub fn server_error(message: impl Into<String>) -> LinesightError {
    LinesightError::Server(message.into())
}
