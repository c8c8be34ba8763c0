use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::{GroundPosition, PixelPoint};

/// Relay activity kinds recorded by the event journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelayEventKind {
    FrameReceived,
    PositionUpdated,
    PointMarked,
    PointsFlushed,
}

/// Immutable event envelope for logging and the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayEvent {
    pub id: Uuid,
    pub kind: RelayEventKind,
    pub timestamp: DateTime<Utc>,
    pub payload: RelayEventPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RelayEventPayload {
    Frame { bytes: usize },
    Position(GroundPosition),
    Point { pixel: PixelPoint, ground: [f64; 2] },
    Flush { count: usize },
}

impl RelayEvent {
    pub fn new(kind: RelayEventKind, payload: RelayEventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Payload pushed to `/outage_ws` subscribers whenever the outage list is
/// flushed. The `points` field carries the same pairs as the HTTP response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlushEvent {
    pub id: Uuid,
    pub flushed_at: DateTime<Utc>,
    pub points: Vec<[f64; 2]>,
}

impl FlushEvent {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self {
            id: Uuid::new_v4(),
            flushed_at: Utc::now(),
            points,
        }
    }
}
