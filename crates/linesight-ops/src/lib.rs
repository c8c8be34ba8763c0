//! Operational helpers: logging setup and the relay event journal.

use std::{collections::VecDeque, sync::Arc};

use linesight_types::{
    config::OpsConfig,
    events::{RelayEvent, RelayEventKind},
    LinesightError, Result,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing(config: &OpsConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.log_level.clone())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| LinesightError::Ops(format!("failed to create log filter: {err}")))?;

    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| LinesightError::Ops(format!("tracing init error: {err}")))?;
    Ok(())
}

const MAX_JOURNAL_ENTRIES: usize = 256;

/// Per-kind counters surfaced by the stats endpoint.
#[derive(Debug, Default, Clone, Serialize)]
pub struct JournalCounters {
    pub frames_received: u64,
    pub positions_updated: u64,
    pub points_marked: u64,
    pub flushes: u64,
}

/// Bounded in-memory record of recent relay activity.
///
/// Nothing persists across a restart; like the rest of the relay state, the
/// journal is ephemeral by contract.
#[derive(Clone, Default)]
pub struct EventJournal {
    inner: Arc<Mutex<JournalInner>>,
}

#[derive(Default)]
struct JournalInner {
    recent: VecDeque<RelayEvent>,
    counters: JournalCounters,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, event: RelayEvent) {
        let mut inner = self.inner.lock().await;
        match event.kind {
            RelayEventKind::FrameReceived => inner.counters.frames_received += 1,
            RelayEventKind::PositionUpdated => inner.counters.positions_updated += 1,
            RelayEventKind::PointMarked => inner.counters.points_marked += 1,
            RelayEventKind::PointsFlushed => inner.counters.flushes += 1,
        }
        if inner.recent.len() == MAX_JOURNAL_ENTRIES {
            inner.recent.pop_front();
        }
        inner.recent.push_back(event);
    }

    pub async fn counters(&self) -> JournalCounters {
        self.inner.lock().await.counters.clone()
    }

    pub async fn recent(&self) -> Vec<RelayEvent> {
        self.inner.lock().await.recent.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesight_types::events::RelayEventPayload;

    #[tokio::test]
    async fn counters_track_event_kinds() {
        let journal = EventJournal::new();
        journal
            .record(RelayEvent::new(
                RelayEventKind::FrameReceived,
                RelayEventPayload::Frame { bytes: 1024 },
            ))
            .await;
        journal
            .record(RelayEvent::new(
                RelayEventKind::FrameReceived,
                RelayEventPayload::Frame { bytes: 2048 },
            ))
            .await;
        journal
            .record(RelayEvent::new(
                RelayEventKind::PointsFlushed,
                RelayEventPayload::Flush { count: 3 },
            ))
            .await;

        let counters = journal.counters().await;
        assert_eq!(counters.frames_received, 2);
        assert_eq!(counters.flushes, 1);
        assert_eq!(counters.points_marked, 0);
        assert_eq!(journal.recent().await.len(), 3);
    }

    #[tokio::test]
    async fn journal_is_bounded() {
        let journal = EventJournal::new();
        for bytes in 0..(MAX_JOURNAL_ENTRIES + 10) {
            journal
                .record(RelayEvent::new(
                    RelayEventKind::FrameReceived,
                    RelayEventPayload::Frame { bytes },
                ))
                .await;
        }
        assert_eq!(journal.recent().await.len(), MAX_JOURNAL_ENTRIES);
        let counters = journal.counters().await;
        assert_eq!(counters.frames_received, (MAX_JOURNAL_ENTRIES + 10) as u64);
    }
}
