use bytes::Bytes;
use chrono::{DateTime, Utc};

/// The single latest encoded camera frame held by the relay.
///
/// The payload is opaque to the relay; it is forwarded to viewers exactly as
/// uploaded. Cloning is cheap, so every streaming viewer snapshots the same
/// underlying buffer.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub data: Bytes,
    pub received_at: DateTime<Utc>,
}

impl VideoFrame {
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            received_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
