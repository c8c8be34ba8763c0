use linesight_types::{config::UplinkConfig, Result};
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::{client::UplinkClient, source::FrameSource};

/// Periodic upload loop: capture, post, and occasionally collect flushed
/// outage points.
///
/// Transport failures are logged and retried up to the configured budget for
/// the current tick, then the frame is dropped; the loop itself never stops
/// on a failed send.
pub struct UplinkRunner<S: FrameSource> {
    source: S,
    client: UplinkClient,
    config: UplinkConfig,
}

impl<S: FrameSource> UplinkRunner<S> {
    pub fn new(source: S, client: UplinkClient, config: UplinkConfig) -> Self {
        Self {
            source,
            client,
            config,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut ticker = interval(Duration::from_millis(self.config.upload_interval_ms));
        let mut tick: u64 = 0;
        info!("Uplink loop started against {}", self.client.base_url());
        loop {
            ticker.tick().await;
            tick += 1;
            self.upload_once().await;
            if self.config.flush_poll_ticks > 0 && tick % self.config.flush_poll_ticks as u64 == 0
            {
                self.collect_outages().await;
            }
        }
    }

    async fn upload_once(&mut self) {
        let frame = match self.source.next_frame().await {
            Ok(frame) => frame,
            Err(err) => {
                warn!("frame capture failed: {err}");
                return;
            }
        };
        for attempt in 1..=self.config.max_retries {
            match self.client.upload(&frame).await {
                Ok(()) => return,
                Err(err) => warn!(
                    "upload attempt {attempt}/{} failed: {err}",
                    self.config.max_retries
                ),
            }
        }
        warn!(
            "dropping frame after {} failed attempts",
            self.config.max_retries
        );
    }

    async fn collect_outages(&self) {
        match self.client.fetch_outage_points().await {
            Ok(points) if points.is_empty() => {}
            Ok(points) => info!("received {} outage point(s): {points:?}", points.len()),
            Err(err) => warn!("outage poll failed: {err}"),
        }
    }
}
