use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use image::{codecs::jpeg::JpegEncoder, ImageBuffer, Rgb};
use linesight_types::{geo::GroundPosition, Result};

use crate::uplink_error;

/// One frame ready for upload, paired with the camera's ground position at
/// capture time.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub jpeg: Bytes,
    pub position: GroundPosition,
}

/// Supplies encoded frames to the upload loop. The camera SDK itself is out
/// of scope, so implementations either synthesize frames or replay recorded
/// ones.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn next_frame(&mut self) -> Result<CapturedFrame>;
}

/// Procedural source for development without camera hardware: renders a
/// moving gradient and drifts the reported position along a straight track.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    origin: GroundPosition,
    drift: (f64, f64),
    tick: u64,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, origin: GroundPosition, drift: (f64, f64)) -> Self {
        Self {
            width,
            height,
            origin,
            drift,
            tick: 0,
        }
    }

    fn render(&self) -> Result<Bytes> {
        let t = (self.tick % 256) as u32;
        let image = ImageBuffer::from_fn(self.width, self.height, |x, y| {
            Rgb([
                ((x + t * 3) % 256) as u8,
                ((y + t) % 256) as u8,
                ((x + y) % 256) as u8,
            ])
        });
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, 80)
            .encode_image(&image)
            .map_err(|err| uplink_error(format!("jpeg encode failed: {err}")))?;
        Ok(Bytes::from(jpeg))
    }
}

#[async_trait]
impl FrameSource for SyntheticSource {
    async fn next_frame(&mut self) -> Result<CapturedFrame> {
        let jpeg = self.render()?;
        let position = GroundPosition::new(
            self.origin.x + self.drift.0 * self.tick as f64,
            self.origin.y + self.drift.1 * self.tick as f64,
        );
        self.tick += 1;
        Ok(CapturedFrame { jpeg, position })
    }
}

/// Replays pre-encoded JPEG frames from a directory in filename order,
/// looping forever. The reported position stays fixed at the given origin.
pub struct DirectorySource {
    frames: Vec<PathBuf>,
    position: GroundPosition,
    cursor: usize,
}

impl DirectorySource {
    pub async fn open(dir: impl AsRef<Path>, position: GroundPosition) -> Result<Self> {
        let dir = dir.as_ref();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|err| uplink_error(format!("unable to read {}: {err}", dir.display())))?;

        let mut frames = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| uplink_error(format!("unable to list {}: {err}", dir.display())))?
        {
            let path = entry.path();
            let is_jpeg = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
                .unwrap_or(false);
            if is_jpeg {
                frames.push(path);
            }
        }
        frames.sort();

        if frames.is_empty() {
            return Err(uplink_error(format!(
                "no .jpg frames found in {}",
                dir.display()
            )));
        }
        Ok(Self {
            frames,
            position,
            cursor: 0,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl FrameSource for DirectorySource {
    async fn next_frame(&mut self) -> Result<CapturedFrame> {
        let path = &self.frames[self.cursor];
        self.cursor = (self.cursor + 1) % self.frames.len();
        let data = tokio::fs::read(path)
            .await
            .map_err(|err| uplink_error(format!("unable to read {}: {err}", path.display())))?;
        Ok(CapturedFrame {
            jpeg: Bytes::from(data),
            position: self.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn synthetic_frames_are_decodable_jpeg() {
        let mut source = SyntheticSource::new(64, 48, GroundPosition::new(0.0, 0.0), (0.0, 0.0));
        let frame = source.next_frame().await.expect("synthetic frame");
        let decoded = image::load_from_memory(&frame.jpeg).expect("decodable jpeg");
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 48);
    }

    #[tokio::test]
    async fn synthetic_position_drifts_per_frame() {
        let mut source =
            SyntheticSource::new(32, 32, GroundPosition::new(10.0, 20.0), (0.5, -1.0));
        let first = source.next_frame().await.expect("first frame");
        let second = source.next_frame().await.expect("second frame");
        let third = source.next_frame().await.expect("third frame");
        assert_eq!((first.position.x, first.position.y), (10.0, 20.0));
        assert_eq!((second.position.x, second.position.y), (10.5, 19.0));
        assert_eq!((third.position.x, third.position.y), (11.0, 18.0));
    }

    #[tokio::test]
    async fn directory_source_requires_frames() {
        let dir = std::env::temp_dir().join("linesight-empty-frames");
        tokio::fs::create_dir_all(&dir).await.expect("create dir");
        let result = DirectorySource::open(&dir, GroundPosition::new(0.0, 0.0)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn directory_source_cycles_in_filename_order() {
        let dir = std::env::temp_dir().join("linesight-replay-frames");
        tokio::fs::create_dir_all(&dir).await.expect("create dir");
        tokio::fs::write(dir.join("b.jpg"), b"second")
            .await
            .expect("write frame");
        tokio::fs::write(dir.join("a.jpg"), b"first")
            .await
            .expect("write frame");
        tokio::fs::write(dir.join("notes.txt"), b"ignored")
            .await
            .expect("write extra file");

        let mut source = DirectorySource::open(&dir, GroundPosition::new(1.0, 2.0))
            .await
            .expect("open source");
        assert_eq!(source.frame_count(), 2);
        let frames = [
            source.next_frame().await.expect("frame"),
            source.next_frame().await.expect("frame"),
            source.next_frame().await.expect("frame"),
        ];
        assert_eq!(frames[0].jpeg.as_ref(), b"first");
        assert_eq!(frames[1].jpeg.as_ref(), b"second");
        assert_eq!(frames[2].jpeg.as_ref(), b"first");
        assert_eq!((frames[0].position.x, frames[0].position.y), (1.0, 2.0));
    }
}
