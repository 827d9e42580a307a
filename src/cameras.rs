//! Cameras and configs for cameras

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::sampling;
use crate::utils::SerdeVector;
use crate::{Point, Ray, Vec3};

/// Camera Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub eye: SerdeVector,
    pub gaze: SerdeVector,
    /// Field-of-view scale applied to both screen basis vectors.
    pub fov: f64,
    /// Distance from the eye to the virtual lens plane.
    #[serde(default = "default_lens_distance")]
    pub lens_distance: f64,
}

fn default_lens_distance() -> f64 {
    140.0
}

/// Pinhole camera
///
/// The screen is spanned by `cx` (scaled by the aspect ratio) and `cy`,
/// both derived from the gaze direction and the field-of-view scale.
#[derive(Debug)]
pub struct Camera {
    eye: Point,
    gaze: Vec3,
    cx: Vec3,
    cy: Vec3,
    lens_distance: f64,
    width: usize,
    height: usize,
}
impl Camera {
    pub fn new(
        eye: Point,
        gaze: Vec3,
        fov: f64,
        lens_distance: f64,
        width: usize,
        height: usize,
    ) -> Self {
        let gaze = gaze.normalize();
        let cx = Vec3::new(width as f64 * fov / height as f64, 0.0, 0.0);
        let cy = cx.cross(&gaze).normalize() * fov;

        Self {
            eye,
            gaze,
            cx,
            cy,
            lens_distance,
            width,
            height,
        }
    }

    pub fn from_config(config: &CameraConfig, width: usize, height: usize) -> Self {
        Self::new(
            config.eye.into(),
            config.gaze.into(),
            config.fov,
            config.lens_distance,
            width,
            height,
        )
    }

    /// Primary ray through subpixel (sx, sy) of pixel (x, y).
    ///
    /// The jitter is tent-filtered so samples blend across subpixel
    /// boundaries instead of box-averaging inside them. Pixel row 0 is the
    /// bottom of the image.
    pub fn get_ray(
        &self,
        x: usize,
        y: usize,
        sx: usize,
        sy: usize,
        rng: &mut dyn RngCore,
    ) -> Ray {
        let dx = sampling::tent_filter_sample(rng.gen());
        let dy = sampling::tent_filter_sample(rng.gen());

        let screen_x = ((sx as f64 + 0.5 + dx) / 2.0 + x as f64) / self.width as f64 - 0.5;
        let screen_y = ((sy as f64 + 0.5 + dy) / 2.0 + y as f64) / self.height as f64 - 0.5;
        let d = self.cx * screen_x + self.cy * screen_y + self.gaze;

        Ray::new(self.eye + d * self.lens_distance, d.normalize())
    }
}
