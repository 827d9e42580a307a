//! Utils

use serde::{Deserialize, Serialize};

use crate::{Color, Vec3};

/// Plain (x, y, z) triple used by the serde config types.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SerdeVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
impl SerdeVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Grey triple with all three components equal.
    pub fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }
}
impl From<SerdeVector> for Vec3 {
    fn from(v: SerdeVector) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}
impl From<Vec3> for SerdeVector {
    fn from(v: Vec3) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Clamp each component to [0, 1].
pub fn clamp(color: &Color) -> Color {
    color.map(|c| c.clamp(0.0, 1.0))
}

/// Component-wise NaN check, used in debug assertions on render output.
pub fn has_nan(v: &Vec3) -> bool {
    v.iter().any(|c| c.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limits_each_component() {
        let c = clamp(&Color::new(-0.5, 0.25, 7.0));
        assert_eq!(c, Color::new(0.0, 0.25, 1.0));
    }

    #[test]
    fn nan_is_detected_per_component() {
        assert!(has_nan(&Vec3::new(0.0, f64::NAN, 0.0)));
        assert!(!has_nan(&Vec3::new(0.0, 1.0, 2.0)));
    }
}
