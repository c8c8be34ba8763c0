//! Pixel-to-ground projection for a nadir-pointing camera.

use linesight_types::{
    config::CameraConfig,
    geo::{GroundPosition, PixelPoint},
};

/// Pinhole ground-footprint model.
///
/// Maps a click on the rendered canvas to an absolute ground coordinate,
/// assuming the camera points straight down over flat ground, with no lens
/// distortion and no yaw or tilt correction. The footprint spans are fixed at
/// construction; only the camera's ground position varies per call.
#[derive(Debug, Clone)]
pub struct GroundProjector {
    footprint_w: f64,
    footprint_h: f64,
    canvas_w: f64,
    canvas_h: f64,
}

impl GroundProjector {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            footprint_w: ground_span(config.altitude_m, config.hfov_deg),
            footprint_h: ground_span(config.altitude_m, config.vfov_deg),
            canvas_w: config.canvas_width as f64,
            canvas_h: config.canvas_height as f64,
        }
    }

    /// Ground area visible at the configured altitude, metres (width, height).
    pub fn footprint(&self) -> (f64, f64) {
        (self.footprint_w, self.footprint_h)
    }

    /// Project a canvas pixel through the camera's current ground position.
    ///
    /// Image y grows downward while ground y grows north, so the vertical
    /// offset is inverted. Pixels outside the canvas extrapolate linearly.
    pub fn project(&self, pixel: PixelPoint, camera: GroundPosition) -> GroundPosition {
        let x_rel = (pixel.x - self.canvas_w / 2.0) / self.canvas_w * self.footprint_w;
        let y_rel = (self.canvas_h / 2.0 - pixel.y) / self.canvas_h * self.footprint_h;
        GroundPosition::new(camera.x + x_rel, camera.y + y_rel)
    }
}

/// Ground distance covered by one field-of-view axis at the given altitude.
fn ground_span(altitude_m: f64, fov_deg: f64) -> f64 {
    2.0 * altitude_m * (fov_deg.to_radians() / 2.0).tan()
}
