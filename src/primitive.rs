//! Analytic primitives for the ray-casting pipeline.
//!
//! Each primitive answers ray queries through the [`Intersect`] trait.
//! Primitives are `Sync` so pixel rows can query them from rayon workers.

use crate::math::vec3::Vec3;

/// Rays parallel to a plane within this tolerance miss it.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A ray/primitive intersection: parametric distance, world-space hit
/// point and the surface normal there.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Contract every ray-traceable primitive implements.
///
/// `direction` is assumed unit length, so `t` is a world-space distance.
/// Only hits strictly in front of the origin (`t > 0`) are reported.
pub trait Intersect: Sync {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Hit>;

    /// Base color used when shading a hit.
    fn color(&self) -> u32;
}

pub struct Sphere {
    center: Vec3,
    radius: f32,
    color: u32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, color: u32) -> Self {
        Self {
            center,
            radius,
            color,
        }
    }
}

impl Intersect for Sphere {
    /// Solves `|O + tD - C|^2 = r^2` for t.
    ///
    /// Takes the smaller positive root; if that root is behind the origin
    /// (camera inside the sphere, or sphere behind the camera) it falls
    /// back to the larger root, and misses when both are non-positive.
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Hit> {
        let oc = origin - self.center;
        let b = 2.0 * oc.dot(direction);
        let c = oc.length_squared() - self.radius * self.radius;

        // Unit direction, so the quadratic's `a` term is 1.
        let discriminant = b * b - 4.0 * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt = discriminant.sqrt();
        let near = (-b - sqrt) / 2.0;
        let far = (-b + sqrt) / 2.0;

        let t = if near > 0.0 {
            near
        } else if far > 0.0 {
            far
        } else {
            return None;
        };

        let point = origin + direction * t;
        Some(Hit {
            t,
            point,
            normal: (point - self.center).normalize(),
        })
    }

    fn color(&self) -> u32 {
        self.color
    }
}

/// An infinite plane through `point` with a fixed orientation.
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    color: u32,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3, color: u32) -> Self {
        Self {
            point,
            normal: normal.normalize(),
            color,
        }
    }
}

impl Intersect for Plane {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Hit> {
        let denominator = self.normal.dot(direction);
        if denominator.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.point - origin).dot(self.normal) / denominator;
        if t <= 0.0 {
            return None;
        }

        Some(Hit {
            t,
            point: origin + direction * t,
            normal: self.normal,
        })
    }

    fn color(&self) -> u32 {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use approx::assert_relative_eq;

    #[test]
    fn ray_at_sphere_center_hits_at_distance_minus_radius() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 10.0), 2.0, colors::RED);
        let hit = sphere
            .intersect(Vec3::ZERO, Vec3::FORWARD)
            .expect("ray aimed at center must hit");
        assert_relative_eq!(hit.t, 8.0, epsilon = 1e-4);
        assert_relative_eq!(hit.normal.z, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn origin_inside_sphere_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 3.0, colors::RED);
        let hit = sphere.intersect(Vec3::ZERO, Vec3::FORWARD).unwrap();
        assert_relative_eq!(hit.t, 3.0, epsilon = 1e-4);
    }

    #[test]
    fn sphere_behind_origin_misses() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 2.0, colors::RED);
        assert!(sphere.intersect(Vec3::ZERO, Vec3::FORWARD).is_none());
    }

    #[test]
    fn off_axis_ray_misses_sphere() {
        let sphere = Sphere::new(Vec3::new(0.0, 5.0, 10.0), 1.0, colors::RED);
        assert!(sphere.intersect(Vec3::ZERO, Vec3::FORWARD).is_none());
    }

    #[test]
    fn downward_ray_hits_ground_plane() {
        let ground = Plane::new(Vec3::new(0.0, -2.0, 0.0), Vec3::UP, colors::GREEN);
        let direction = Vec3::new(0.0, -1.0, 1.0).normalize();
        let hit = ground.intersect(Vec3::ZERO, direction).unwrap();
        assert_relative_eq!(hit.point.y, -2.0, epsilon = 1e-4);
        assert_eq!(hit.normal, Vec3::UP);
    }

    #[test]
    fn parallel_ray_misses_plane() {
        let ground = Plane::new(Vec3::new(0.0, -2.0, 0.0), Vec3::UP, colors::GREEN);
        assert!(ground.intersect(Vec3::ZERO, Vec3::FORWARD).is_none());
    }
}
