use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A click location in rendered-canvas pixel space. The origin is the canvas
/// top-left corner, with y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Absolute position in the ground reference frame, metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPosition {
    pub x: f64,
    pub y: f64,
}

impl GroundPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An operator-marked ground location awaiting drone inspection.
///
/// Coordinates are fixed at click time against whatever camera position was
/// current; they are never re-projected afterwards. `marked_at` is kept for
/// operator forensics only and never leaves the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutagePoint {
    pub x: f64,
    pub y: f64,
    pub marked_at: DateTime<Utc>,
}

impl OutagePoint {
    pub fn new(position: GroundPosition) -> Self {
        Self {
            x: position.x,
            y: position.y,
            marked_at: Utc::now(),
        }
    }

    /// Wire representation shared by every point-list payload.
    pub fn as_pair(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}
