//! Direction samplers and filter distributions
//!
//! All hemisphere samplers are expressed around +z; callers rotate the
//! result into a surface frame with [`orthonormal_basis`].

use std::f64::consts::PI;

use crate::Vec3;

/// Uniform direction on the unit sphere.
pub fn uniform_sample_on_sphere(u1: f64, u2: f64) -> Vec3 {
    let cos_theta = 1.0 - 2.0 * u1;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * u2;
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Uniform direction on the hemisphere around +z.
pub fn uniform_sample_on_hemisphere(u1: f64, u2: f64) -> Vec3 {
    // u1 is the cosine of the polar angle
    let sin_theta = (1.0 - u1 * u1).max(0.0).sqrt();
    let phi = 2.0 * PI * u2;
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, u1)
}

/// Cosine-weighted direction on the hemisphere around +z.
///
/// The sampling density cancels the cosine factor of the rendering
/// equation, so a diffuse bounce needs no weight beyond the albedo.
pub fn cosine_weighted_sample_on_hemisphere(u1: f64, u2: f64) -> Vec3 {
    let cos_theta = (1.0 - u1).sqrt();
    let sin_theta = u1.sqrt();
    let phi = 2.0 * PI * u2;
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Orthonormal basis (u, v) completing the unit vector w.
pub fn orthonormal_basis(w: &Vec3) -> (Vec3, Vec3) {
    // Pick the coordinate axis furthest from w to avoid a degenerate cross
    // product.
    let pole = if w[0].abs() > 0.1 {
        Vec3::new(0.0, 1.0, 0.0)
    } else {
        Vec3::new(1.0, 0.0, 0.0)
    };
    let u = pole.cross(w).normalize();
    let v = w.cross(&u);
    (u, v)
}

/// Mirror reflection of d about the normal n.
pub fn reflect(d: &Vec3, n: &Vec3) -> Vec3 {
    d - 2.0 * n.dot(d) * n
}

/// Tent-filtered jitter in [-1, 1) from a uniform u in [0, 1).
///
/// Inverse CDF of the triangular reconstruction filter.
pub fn tent_filter_sample(u: f64) -> f64 {
    let u = 2.0 * u;
    if u < 1.0 {
        u.sqrt() - 1.0
    } else {
        1.0 - (2.0 - u).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const TOL: f64 = 1e-12;

    #[test]
    fn cosine_sample_is_unit_and_upward() {
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..100 {
            let d = cosine_weighted_sample_on_hemisphere(rng.gen(), rng.gen());
            assert!((d.norm() - 1.0).abs() < 1e-9);
            assert!(d[2] >= 0.0);
        }
        // u1 = 0 is the pole
        let pole = cosine_weighted_sample_on_hemisphere(0.0, 0.3);
        assert!((pole - Vec3::new(0.0, 0.0, 1.0)).norm() < TOL);
    }

    #[test]
    fn uniform_hemisphere_sample_keeps_cosine() {
        let d = uniform_sample_on_hemisphere(0.25, 0.75);
        assert!((d.norm() - 1.0).abs() < 1e-9);
        assert!((d[2] - 0.25).abs() < TOL);
    }

    #[test]
    fn basis_is_orthonormal_and_right_handed() {
        let w = Vec3::new(0.3, -0.4, 0.5).normalize();
        let (u, v) = orthonormal_basis(&w);
        assert!(u.dot(&v).abs() < TOL);
        assert!(u.dot(&w).abs() < TOL);
        assert!(v.dot(&w).abs() < TOL);
        assert!((u.norm() - 1.0).abs() < 1e-9);
        assert!((u.cross(&v).dot(&w) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn reflection_mirrors_about_the_normal() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let n = Vec3::new(0.0, 1.0, 0.0);
        let r = reflect(&d, &n);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).norm() < TOL);
    }

    #[test]
    fn tent_sample_stays_in_range_and_centres() {
        assert!(tent_filter_sample(0.5).abs() < TOL);
        for i in 0..100 {
            let x = tent_filter_sample(i as f64 / 100.0);
            assert!((-1.0..1.0).contains(&x));
        }
    }
}
