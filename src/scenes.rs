//! Scene configuration and the built-in reference scene

use serde::{Deserialize, Serialize};

use crate::cameras::CameraConfig;
use crate::materials::{DiffuseConfig, MaterialConfig, RefractiveConfig, SpecularConfig};
use crate::objects::{HittableListConfig, SphereConfig};
use crate::utils::SerdeVector;

/// Image Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub width: usize,
    pub height: usize,
}

/// A complete scene description: image dimensions, camera pose, and the
/// object list. Serializable so scenes can live in YAML files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub image: ImageConfig,
    pub camera: CameraConfig,
    pub world: HittableListConfig,
}

const WALL_RADIUS: f64 = 1e5;

fn wall(center: SerdeVector, albedo: SerdeVector) -> SphereConfig {
    SphereConfig {
        center,
        radius: WALL_RADIUS,
        material: MaterialConfig::Diffuse(DiffuseConfig {
            albedo,
            emission: SerdeVector::default(),
        }),
    }
}

/// The reference box scene: six giant wall spheres enclosing a mirror
/// sphere, a glass sphere, and an overhead spherical light, viewed by a
/// camera at the open end of the box.
pub fn cornell_box() -> SceneConfig {
    let grey = SerdeVector::splat(0.75);
    let objects = vec![
        // Left and right walls
        wall(
            SerdeVector::new(WALL_RADIUS + 1.0, 40.8, 81.6),
            SerdeVector::new(0.75, 0.25, 0.25),
        ),
        wall(
            SerdeVector::new(-WALL_RADIUS + 99.0, 40.8, 81.6),
            SerdeVector::new(0.25, 0.25, 0.75),
        ),
        // Back and front walls
        wall(SerdeVector::new(50.0, 40.8, WALL_RADIUS), grey),
        wall(
            SerdeVector::new(50.0, 40.8, -WALL_RADIUS + 170.0),
            SerdeVector::default(),
        ),
        // Floor and ceiling
        wall(SerdeVector::new(50.0, WALL_RADIUS, 81.6), grey),
        wall(SerdeVector::new(50.0, -WALL_RADIUS + 81.6, 81.6), grey),
        // Mirror sphere
        SphereConfig {
            center: SerdeVector::new(27.0, 16.5, 47.0),
            radius: 16.5,
            material: MaterialConfig::Specular(SpecularConfig {
                albedo: SerdeVector::splat(0.999),
                emission: SerdeVector::default(),
            }),
        },
        // Glass sphere
        SphereConfig {
            center: SerdeVector::new(73.0, 16.5, 78.0),
            radius: 16.5,
            material: MaterialConfig::Refractive(RefractiveConfig {
                albedo: SerdeVector::splat(0.999),
                emission: SerdeVector::default(),
                ir: 1.5,
            }),
        },
        // Overhead light
        SphereConfig {
            center: SerdeVector::new(50.0, 681.6 - 0.27, 81.6),
            radius: 600.0,
            material: MaterialConfig::Diffuse(DiffuseConfig {
                albedo: SerdeVector::default(),
                emission: SerdeVector::splat(12.0),
            }),
        },
    ];

    SceneConfig {
        image: ImageConfig {
            width: 1024,
            height: 768,
        },
        camera: CameraConfig {
            eye: SerdeVector::new(50.0, 52.0, 295.6),
            gaze: SerdeVector::new(0.0, -0.042612, -1.0),
            fov: 0.5135,
            lens_distance: 140.0,
        },
        world: HittableListConfig { objects },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::HittableList;

    #[test]
    fn reference_scene_has_nine_objects() {
        let config = cornell_box();
        assert_eq!(config.world.objects.len(), 9);
        let world = HittableList::from_config(config.world);
        assert_eq!(world.len(), 9);
    }

    #[test]
    fn shipped_yaml_matches_the_reference_scene() {
        let parsed: SceneConfig =
            serde_yaml::from_str(include_str!("../scenes/cornell.yaml")).unwrap();
        let built = cornell_box();

        assert_eq!(parsed.image.width, built.image.width);
        assert_eq!(parsed.image.height, built.image.height);
        assert_eq!(parsed.world.objects.len(), built.world.objects.len());
        assert_eq!(parsed.camera.fov, built.camera.fov);
        for (p, b) in parsed.world.objects.iter().zip(&built.world.objects) {
            assert_eq!(p.radius, b.radius);
            assert_eq!(p.center.x, b.center.x);
        }
    }
}
