//! Implementation of materials

use crate::{objects::HitRecord, sampling, utils::SerdeVector, Color, Material, Ray};
use dyn_clone::DynClone;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Material
pub trait Scatterable: DynClone {
    /// Radiance emitted by the surface.
    fn emitted(&self) -> Color;

    /// Reflectance of the surface. Its largest component doubles as the
    /// Russian-roulette survival probability in the estimator.
    fn albedo(&self) -> Color;

    /// Sample the next path segment. `None` means the path is absorbed.
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;
}

/// Scatter Result
#[derive(Debug)]
pub struct ScatterResult {
    /// Throughput factor for the chosen path segment
    pub attenuation: Color,
    /// Resulting Scattered Ray
    pub scattered: Ray,
}

/// Config for materials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialConfig {
    Diffuse(DiffuseConfig),
    Specular(SpecularConfig),
    Refractive(RefractiveConfig),
}

/// Generator from config
pub struct Generator;
impl Generator {
    pub fn from_config(config: MaterialConfig) -> Material {
        match config {
            MaterialConfig::Diffuse(c) => Box::new(Diffuse::from_config(c)),
            MaterialConfig::Specular(c) => Box::new(Specular::from_config(c)),
            MaterialConfig::Refractive(c) => Box::new(Refractive::from_config(c)),
        }
    }
}

/// Diffuse (Lambertian) scatterer
#[derive(Debug, Clone)]
pub struct Diffuse {
    albedo: Color,
    emission: Color,
}
impl Diffuse {
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo,
            emission: Color::zeros(),
        }
    }

    pub fn emissive(albedo: Color, emission: Color) -> Self {
        Self { albedo, emission }
    }

    pub fn from_config(config: DiffuseConfig) -> Self {
        Self::emissive(config.albedo.into(), config.emission.into())
    }
}
impl Scatterable for Diffuse {
    fn emitted(&self) -> Color {
        self.emission
    }

    fn albedo(&self) -> Color {
        self.albedo
    }

    fn try_scatter(
        &self,
        _ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Cosine-weighted bounce in the frame of the oriented normal
        let w = hit_record.normal;
        let (u, v) = sampling::orthonormal_basis(&w);
        let s = sampling::cosine_weighted_sample_on_hemisphere(rng.gen(), rng.gen());
        let direction = (s[0] * u + s[1] * v + s[2] * w).normalize();

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(hit_record.p, direction),
        })
    }
}

/// Diffuse Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffuseConfig {
    pub albedo: SerdeVector,
    #[serde(default)]
    pub emission: SerdeVector,
}

/// Ideal mirror scatterer
#[derive(Debug, Clone)]
pub struct Specular {
    albedo: Color,
    emission: Color,
}
impl Specular {
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo,
            emission: Color::zeros(),
        }
    }

    pub fn from_config(config: SpecularConfig) -> Self {
        Self {
            albedo: config.albedo.into(),
            emission: config.emission.into(),
        }
    }
}
impl Scatterable for Specular {
    fn emitted(&self) -> Color {
        self.emission
    }

    fn albedo(&self) -> Color {
        self.albedo
    }

    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = sampling::reflect(&ray_in.dir.normalize(), &hit_record.normal);
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(hit_record.p, reflected),
        })
    }
}

/// Specular Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecularConfig {
    pub albedo: SerdeVector,
    #[serde(default)]
    pub emission: SerdeVector,
}

/// A Refractive material is a dielectric, such as glass
///
/// One uniform draw chooses between the Fresnel-weighted reflected and
/// transmitted branches; the chosen branch is reweighted by its selection
/// probability so the estimate stays unbiased without evaluating both.
#[derive(Debug, Clone)]
pub struct Refractive {
    albedo: Color,
    emission: Color,
    ir: f64,
}
impl Refractive {
    pub fn new(albedo: Color, ir: f64) -> Self {
        Self {
            albedo,
            emission: Color::zeros(),
            ir,
        }
    }

    pub fn from_config(config: RefractiveConfig) -> Self {
        Self {
            albedo: config.albedo.into(),
            emission: config.emission.into(),
            ir: config.ir,
        }
    }

    fn reflectance(cosine_term: f64, ref_idx: f64) -> f64 {
        // Use Schlick's approximation for reflectance
        let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
        r0 + (1.0 - r0) * cosine_term.powi(5)
    }
}
impl Scatterable for Refractive {
    fn emitted(&self) -> Color {
        self.emission
    }

    fn albedo(&self) -> Color {
        self.albedo
    }

    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let unit_direction = ray_in.dir.normalize();
        let reflected = sampling::reflect(&unit_direction, &hit_record.normal);

        let refraction_ratio = if hit_record.front_face {
            1.0 / self.ir
        } else {
            self.ir
        };
        // The stored normal opposes the ray, so this cosine is negative
        let cos_theta = unit_direction.dot(&hit_record.normal);
        let discriminant = 1.0 - refraction_ratio.powi(2) * (1.0 - cos_theta.powi(2));

        // Total internal reflection
        if discriminant < 0.0 {
            return Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(hit_record.p, reflected),
            });
        }

        let transmitted = (refraction_ratio * unit_direction
            - hit_record.normal * (refraction_ratio * cos_theta + discriminant.sqrt()))
        .normalize();
        let cosine_term = 1.0
            - if hit_record.front_face {
                -cos_theta
            } else {
                transmitted.dot(&(-hit_record.normal))
            };

        let re = Self::reflectance(cosine_term, self.ir);
        let p_reflect = 0.25 + 0.5 * re;
        let (direction, weight) = if rng.gen::<f64>() < p_reflect {
            (reflected, re / p_reflect)
        } else {
            (transmitted, (1.0 - re) / (1.0 - p_reflect))
        };

        Some(ScatterResult {
            attenuation: weight * self.albedo,
            scattered: Ray::new(hit_record.p, direction),
        })
    }
}

/// Refractive Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefractiveConfig {
    pub albedo: SerdeVector,
    #[serde(default)]
    pub emission: SerdeVector,
    #[serde(default = "default_refractive_index")]
    pub ir: f64,
}

fn default_refractive_index() -> f64 {
    1.5
}
