//! Monte Carlo path tracing library
//!
//! Estimates per-pixel radiance for scenes of spheres by iteratively
//! sampling light paths. Scanlines are distributed across a worker pool;
//! see [`render::render`] for the driver.

use nalgebra::Vector3;
use rand::{Rng, RngCore};

pub mod cameras;
pub mod imageio;
pub mod materials;
pub mod objects;
pub mod render;
pub mod sampling;
pub mod scenes;
pub mod tasks;
pub mod utils;

use objects::Hittable;

pub type Vec3 = Vector3<f64>;
pub type Point = Vec3;
pub type Color = Vec3;
pub type Material = Box<dyn materials::Scatterable + Send + Sync>;

/// Minimum hit distance for secondary rays, so a path leaving a surface
/// does not immediately re-hit it.
pub const HIT_EPSILON: f64 = 1e-4;

/// Bounce count after which Russian roulette may terminate a path.
const MIN_BOUNCES: u32 = 4;

/// Prelude
pub mod prelude {
    pub use crate::cameras::Camera;
    pub use crate::materials::{Diffuse, Refractive, Specular};
    pub use crate::objects::{HittableList, HittableObj, Sphere};
    pub use crate::render::{render, RenderConfig};
    pub use crate::{Color, Material, Point, Ray, Vec3};
}

/// The ray in ray tracing
#[derive(Debug, Clone)]
pub struct Ray {
    pub orig: Point,
    pub dir: Vec3,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec3) -> Self {
        Self { orig, dir }
    }

    pub fn get(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }

    /// Estimate the radiance arriving along this ray.
    ///
    /// Walks the path one bounce at a time: each hit contributes its
    /// emission scaled by the accumulated throughput, the throughput picks
    /// up the surface attenuation, and the loop ends on a miss, on
    /// absorption, or when Russian roulette kills a deep path.
    pub fn radiance(&self, world: &impl Hittable, rng: &mut dyn RngCore) -> Color {
        let mut ray = self.clone();
        let mut radiance = Color::zeros();
        let mut throughput = Color::new(1.0, 1.0, 1.0);
        let mut depth = 0u32;

        loop {
            let hr = match world.try_hit(&ray, HIT_EPSILON, f64::INFINITY) {
                Some(hr) => hr,
                None => return radiance,
            };

            radiance += throughput.component_mul(&hr.material.emitted());

            // Russian roulette: survival probability is the largest albedo
            // component; survivors are reweighted so the estimate stays
            // unbiased.
            if depth > MIN_BOUNCES {
                let continue_probability = hr.material.albedo().max();
                if rng.gen::<f64>() >= continue_probability {
                    return radiance;
                }
                throughput /= continue_probability;
            }

            match hr.material.try_scatter(&ray, &hr, rng) {
                Some(sr) => {
                    throughput = throughput.component_mul(&sr.attenuation);
                    ray = sr.scattered;
                    depth += 1;
                }
                None => return radiance,
            }
        }
    }
}
