//! Lighting for both render pipelines.

use crate::math::vec3::Vec3;

/// A directional light with a constant ambient floor.
///
/// Both pipelines shade with the same Lambertian model: the diffuse term
/// is scaled into the headroom above the ambient floor, so intensity is
/// `ambient + (1 - ambient) * max(0, dot(normal, -direction))` and stays
/// in [0, 1] for unit normals.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// The normalized direction the light travels (not where it comes from).
    direction: Vec3,
    ambient: f32,
}

impl DirectionalLight {
    /// Create a light traveling along `direction` (normalized here) with
    /// the given ambient coefficient.
    pub fn new(direction: Vec3, ambient: f32) -> Self {
        Self {
            direction: direction.normalize(),
            ambient,
        }
    }

    /// Shading intensity for a surface normal, in [0, 1].
    pub fn intensity(&self, normal: Vec3) -> f32 {
        let diffuse = (-self.direction).dot(normal).max(0.0);
        self.ambient + (1.0 - self.ambient) * diffuse
    }

    pub fn ambient(&self) -> f32 {
        self.ambient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn facing_the_light_gives_full_intensity() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0), 0.25);
        let normal = Vec3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(light.intensity(normal), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn facing_away_leaves_only_ambient() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0), 0.25);
        let normal = Vec3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(light.intensity(normal), 0.25, epsilon = 1e-5);
    }

    #[test]
    fn grazing_angle_sits_between_ambient_and_full() {
        // Light straight down, normal at 45 degrees: diffuse = cos(45)
        let light = DirectionalLight::new(Vec3::new(0.0, -1.0, 0.0), 0.25);
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let expected = 0.25 + 0.75 * std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(light.intensity(normal), expected, epsilon = 1e-4);
    }
}
