//! Objects

use crate::{materials, materials::MaterialConfig, utils::SerdeVector, Material, Point, Ray, Vec3};
use serde::{Deserialize, Serialize};

pub type HittableObj = Box<dyn Hittable + Send + Sync>;

pub trait Hittable {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord>;
}

/// The scene: an ordered list of hittables scanned linearly.
#[derive(Default)]
pub struct HittableList(pub Vec<HittableObj>);
impl HittableList {
    pub fn add(&mut self, boxed_obj: HittableObj) {
        self.0.push(boxed_obj)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_config(config: HittableListConfig) -> Self {
        let mut s = Self::default();
        for obj_cfg in config.objects {
            let obj = Sphere::from_config(obj_cfg);
            s.add(Box::new(obj));
        }
        s
    }
}
impl Hittable for HittableList {
    /// Nearest hit over the whole list.
    ///
    /// Each successful test shrinks `closest_so_far`, so later members are
    /// checked against the tightest bound seen so far and the record left
    /// standing is the global nearest regardless of list order.
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let mut closest_so_far = t_max;
        let mut hr_final = None;

        for obj in &self.0 {
            if let Some(hr) = obj.try_hit(ray, t_min, closest_so_far) {
                closest_so_far = hr.t;
                hr_final = Some(hr)
            }
        }
        hr_final
    }
}

/// Hittable List Config
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HittableListConfig {
    pub objects: Vec<SphereConfig>,
}

/// Represents a hit
pub struct HitRecord {
    /// Point of intersection
    pub p: Point,
    /// Normal vector, flipped to oppose the incident ray
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub t: f64,
    /// Whether the outward normal faced the ray
    pub front_face: bool,
    /// Material
    pub material: Material,
}
impl HitRecord {
    pub fn new(p: Point, t: f64, ray: &Ray, outward_normal: &Vec3, material: Material) -> Self {
        let front_face = ray.dir.dot(outward_normal) < 0.0;
        let mut normal = outward_normal.to_owned();
        if !front_face {
            normal = -normal;
        }
        Self {
            p,
            normal,
            t,
            front_face,
            material,
        }
    }
}

pub struct Sphere {
    pub center: Point,
    pub radius: f64,
    pub material: Material,
}
impl Sphere {
    pub fn new(center: Point, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn from_config(config: SphereConfig) -> Self {
        Self::new(
            config.center.into(),
            config.radius,
            materials::Generator::from_config(config.material),
        )
    }
}
impl Hittable for Sphere {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let oc = ray.orig - self.center;
        let a = ray.dir.norm_squared();
        let half_b = oc.dot(&ray.dir);
        let c = oc.norm_squared() - self.radius.powi(2);
        let discriminant = half_b.powi(2) - a * c;
        if discriminant < 0.0 {
            return None;
        }

        // Try the near root first; fall back to the far root. A root is
        // accepted only strictly inside (t_min, t_max).
        let sqrtd = discriminant.sqrt();
        let mut root = (-half_b - sqrtd) / a;
        if root <= t_min || t_max <= root {
            root = (-half_b + sqrtd) / a;
            if root <= t_min || t_max <= root {
                return None;
            }
        }
        let p = ray.get(root);
        let outward_normal = (p - self.center) / self.radius;
        // NOTE -- we use dyn_clone here because self.material is a trait
        // object -- you cannot clone a trait object
        Some(HitRecord::new(
            p,
            root,
            ray,
            &outward_normal,
            dyn_clone::clone_box(&*self.material),
        ))
    }
}

/// Sphere config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereConfig {
    pub center: SerdeVector,
    pub radius: f64,
    pub material: MaterialConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Diffuse;
    use crate::Color;

    fn grey_sphere(center: Point, radius: f64) -> Sphere {
        Sphere::new(
            center,
            radius,
            Box::new(Diffuse::new(Color::new(0.5, 0.5, 0.5))),
        )
    }

    #[test]
    fn direct_hit_reports_the_near_root() {
        let sphere = grey_sphere(Point::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0));

        let hr = sphere.try_hit(&ray, 1e-4, f64::INFINITY).unwrap();
        assert!((hr.t - 4.0).abs() < 1e-12);
        assert!(hr.front_face);
        assert!((hr.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let sphere = grey_sphere(Point::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, 1.0));
        assert!(sphere.try_hit(&ray, 1e-4, f64::INFINITY).is_none());
    }

    #[test]
    fn hit_from_inside_uses_the_far_root() {
        let sphere = grey_sphere(Point::zeros(), 2.0);
        let ray = Ray::new(Point::zeros(), Vec3::new(1.0, 0.0, 0.0));

        let hr = sphere.try_hit(&ray, 1e-4, f64::INFINITY).unwrap();
        assert!((hr.t - 2.0).abs() < 1e-12);
        assert!(!hr.front_face);
        // Normal is flipped back toward the ray origin
        assert!((hr.normal - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn interval_bounds_select_the_root() {
        // Roots at t = 4 and t = 6
        let sphere = grey_sphere(Point::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0));

        assert!(sphere.try_hit(&ray, 1e-4, 3.0).is_none());
        let far = sphere.try_hit(&ray, 5.0, f64::INFINITY).unwrap();
        assert!((far.t - 6.0).abs() < 1e-12);
        assert!(sphere.try_hit(&ray, 7.0, f64::INFINITY).is_none());
    }

    #[test]
    fn nearest_hit_is_order_invariant() {
        let near = || Box::new(grey_sphere(Point::new(0.0, 0.0, -5.0), 1.0)) as HittableObj;
        let far = || Box::new(grey_sphere(Point::new(0.0, 0.0, -10.0), 1.0)) as HittableObj;
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0));

        let mut forward = HittableList::default();
        forward.add(near());
        forward.add(far());
        let mut backward = HittableList::default();
        backward.add(far());
        backward.add(near());

        let t_forward = forward.try_hit(&ray, 1e-4, f64::INFINITY).unwrap().t;
        let t_backward = backward.try_hit(&ray, 1e-4, f64::INFINITY).unwrap().t;
        assert!((t_forward - 4.0).abs() < 1e-12);
        assert!((t_forward - t_backward).abs() < 1e-12);
    }
}
