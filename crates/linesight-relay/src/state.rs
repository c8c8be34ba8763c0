use std::{mem, sync::Arc};

use bytes::Bytes;
use linesight_projection::GroundProjector;
use linesight_types::{
    geo::{GroundPosition, OutagePoint, PixelPoint},
    video::VideoFrame,
    LinesightError, Result,
};
use tokio::sync::Mutex;
use tracing::debug;

/// Owned relay state: the single latest frame, the single latest camera
/// position, and the ordered outage-point list.
///
/// Each field sits behind its own lock and is overwritten last-write-wins;
/// a viewer may legitimately observe a frame paired with a camera position
/// from a different moment.
#[derive(Clone)]
pub struct RelayState {
    projector: Arc<GroundProjector>,
    frame: Arc<Mutex<Option<VideoFrame>>>,
    camera: Arc<Mutex<Option<GroundPosition>>>,
    points: Arc<Mutex<Vec<OutagePoint>>>,
}

impl RelayState {
    pub fn new(projector: GroundProjector) -> Self {
        Self {
            projector: Arc::new(projector),
            frame: Arc::new(Mutex::new(None)),
            camera: Arc::new(Mutex::new(None)),
            points: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the latest frame unconditionally. No queue, no history.
    pub async fn set_frame(&self, data: Bytes) {
        let mut slot = self.frame.lock().await;
        *slot = Some(VideoFrame::new(data));
    }

    /// Snapshot of the latest frame; absent before the first upload.
    pub async fn frame(&self) -> Option<VideoFrame> {
        self.frame.lock().await.clone()
    }

    /// Replace the camera's ground position unconditionally.
    pub async fn set_camera_position(&self, position: GroundPosition) {
        let mut slot = self.camera.lock().await;
        *slot = Some(position);
    }

    pub async fn camera_position(&self) -> Option<GroundPosition> {
        *self.camera.lock().await
    }

    /// Project an operator click against the camera position current at this
    /// instant and append the result to the outage list.
    pub async fn mark_point(&self, pixel: PixelPoint) -> Result<OutagePoint> {
        let camera =
            (*self.camera.lock().await).ok_or(LinesightError::MissingCameraPosition)?;
        let ground = self.projector.project(pixel, camera);
        let point = OutagePoint::new(ground);
        self.points.lock().await.push(point.clone());
        debug!(
            "marked outage point ({:.2}, {:.2}) from pixel ({:.0}, {:.0})",
            ground.x, ground.y, pixel.x, pixel.y
        );
        Ok(point)
    }

    /// Return every accumulated point and clear the list in one step.
    ///
    /// Mark and flush contend on the same lock, so each point lands in
    /// exactly one flush result.
    pub async fn flush_points(&self) -> Vec<OutagePoint> {
        let mut points = self.points.lock().await;
        mem::take(&mut *points)
    }

    /// Non-destructive copy of the pending list.
    pub async fn peek_points(&self) -> Vec<OutagePoint> {
        self.points.lock().await.clone()
    }

    pub async fn pending_points(&self) -> usize {
        self.points.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesight_types::config::CameraConfig;

    fn test_state() -> RelayState {
        RelayState::new(GroundProjector::new(&CameraConfig::default()))
    }

    #[tokio::test]
    async fn marking_before_any_position_is_rejected() {
        let state = test_state();
        let result = state.mark_point(PixelPoint::new(320.0, 240.0)).await;
        assert!(matches!(result, Err(LinesightError::MissingCameraPosition)));
        assert!(state.peek_points().await.is_empty());
    }

    #[tokio::test]
    async fn second_frame_overwrites_the_first() {
        let state = test_state();
        state.set_frame(Bytes::from_static(b"first")).await;
        state.set_frame(Bytes::from_static(b"second")).await;
        let frame = state.frame().await.expect("frame present");
        assert_eq!(frame.data.as_ref(), b"second");
    }

    #[tokio::test]
    async fn frame_is_absent_before_first_upload() {
        let state = test_state();
        assert!(state.frame().await.is_none());
    }

    #[tokio::test]
    async fn center_click_lands_on_the_camera() {
        let state = test_state();
        state
            .set_camera_position(GroundPosition::new(100.0, 200.0))
            .await;
        let point = state
            .mark_point(PixelPoint::new(320.0, 240.0))
            .await
            .expect("projection succeeds");
        assert_eq!(point.as_pair(), [100.0, 200.0]);

        let flushed = state.flush_points().await;
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].as_pair(), [100.0, 200.0]);
        assert!(state.flush_points().await.is_empty());
    }

    #[tokio::test]
    async fn points_project_against_the_position_current_at_click_time() {
        let state = test_state();
        state.set_camera_position(GroundPosition::new(0.0, 0.0)).await;
        state
            .mark_point(PixelPoint::new(320.0, 240.0))
            .await
            .expect("first mark");
        state
            .set_camera_position(GroundPosition::new(50.0, -10.0))
            .await;
        state
            .mark_point(PixelPoint::new(320.0, 240.0))
            .await
            .expect("second mark");

        let flushed = state.flush_points().await;
        assert_eq!(flushed[0].as_pair(), [0.0, 0.0]);
        assert_eq!(flushed[1].as_pair(), [50.0, -10.0]);
    }

    #[tokio::test]
    async fn peek_leaves_the_list_intact() {
        let state = test_state();
        state.set_camera_position(GroundPosition::new(0.0, 0.0)).await;
        state
            .mark_point(PixelPoint::new(10.0, 10.0))
            .await
            .expect("mark");
        assert_eq!(state.peek_points().await.len(), 1);
        assert_eq!(state.peek_points().await.len(), 1);
        assert_eq!(state.flush_points().await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_marks_and_flushes_lose_nothing() {
        use std::collections::HashSet;

        const ADDERS: usize = 8;
        const PER_ADDER: usize = 50;

        let state = test_state();
        state.set_camera_position(GroundPosition::new(0.0, 0.0)).await;

        let mut adders = Vec::new();
        for task in 0..ADDERS {
            let state = state.clone();
            adders.push(tokio::spawn(async move {
                for i in 0..PER_ADDER {
                    // Distinct pixel per point so results are distinguishable
                    // after projection.
                    let pixel = PixelPoint::new((task * PER_ADDER + i) as f64, 0.0);
                    state.mark_point(pixel).await.expect("mark under load");
                    tokio::task::yield_now().await;
                }
            }));
        }

        let flusher = {
            let state = state.clone();
            tokio::spawn(async move {
                let mut collected = Vec::new();
                while collected.len() < ADDERS * PER_ADDER {
                    collected.extend(state.flush_points().await);
                    tokio::task::yield_now().await;
                }
                collected
            })
        };

        for adder in adders {
            adder.await.expect("adder task");
        }
        let collected = flusher.await.expect("flusher task");

        assert_eq!(collected.len(), ADDERS * PER_ADDER);
        let distinct: HashSet<u64> = collected.iter().map(|p| p.x.to_bits()).collect();
        assert_eq!(distinct.len(), ADDERS * PER_ADDER);
        assert!(state.flush_points().await.is_empty());
    }
}
