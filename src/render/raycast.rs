//! Ray-casting pipeline.
//!
//! Instead of projecting triangles, every output pixel shoots one ray
//! from the camera through a virtual projection plane and intersects it
//! against the scene's analytic primitives. Closest positive hit wins;
//! misses fall back to a vertical sky gradient. Cost is pixels times
//! primitives, so this only makes sense for small primitive counts.

use rayon::prelude::*;

use super::{FrameBuffer, RenderPipeline};
use crate::camera::Camera;
use crate::colors;
use crate::light::DirectionalLight;
use crate::primitive::Hit;
use crate::scene::Scene;
use crate::settings::RenderSettings;

/// Sky gradient endpoints: horizon white, zenith blue.
const SKY_HORIZON: u32 = 0xFFFFFFFF;
const SKY_ZENITH: u32 = 0xFF80B2FF;

pub struct RayCastPipeline {
    light: DirectionalLight,
}

impl RayCastPipeline {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            light: DirectionalLight::new(settings.light_direction, settings.ambient),
        }
    }

    /// Background for a ray that hits nothing, blended by how far the ray
    /// points upward.
    fn sky_color(direction_y: f32) -> u32 {
        let t = 0.5 * (direction_y + 1.0);
        let (hr, hg, hb) = colors::unpack_rgb(SKY_HORIZON);
        let (zr, zg, zb) = colors::unpack_rgb(SKY_ZENITH);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        colors::pack_rgb(lerp(hr, zr), lerp(hg, zg), lerp(hb, zb))
    }
}

impl RenderPipeline for RayCastPipeline {
    fn render(&self, camera: &Camera, scene: &Scene, frame: &mut FrameBuffer) {
        let width = frame.width();
        let height = frame.height();
        let origin = camera.position();
        let forward = camera.forward();
        let right = camera.right();
        let up = camera.up();

        // Projection plane at unit distance: a pixel's offset on the plane
        // is scaled by tan(fov/2), horizontally stretched by the aspect.
        let plane_half_height = (camera.fov_y() / 2.0).tan();
        let plane_half_width = plane_half_height * camera.aspect_ratio();

        let light = self.light;
        frame
            .par_rows_mut()
            .enumerate()
            .for_each(|(y, (color_row, depth_row))| {
                let ndc_y = 1.0 - 2.0 * (y as f32 + 0.5) / height as f32;
                let plane_y = ndc_y * plane_half_height;

                for x in 0..width as usize {
                    let ndc_x = 2.0 * (x as f32 + 0.5) / width as f32 - 1.0;
                    let plane_x = ndc_x * plane_half_width;
                    let direction = (forward + right * plane_x + up * plane_y).normalize();

                    let mut closest: Option<(Hit, u32)> = None;
                    for primitive in scene.primitives() {
                        if let Some(hit) = primitive.intersect(origin, direction) {
                            let nearer = closest
                                .as_ref()
                                .map_or(true, |(best, _)| hit.t < best.t);
                            if nearer {
                                closest = Some((hit, primitive.color()));
                            }
                        }
                    }

                    match closest {
                        Some((hit, base_color)) => {
                            color_row[x] =
                                colors::modulate(base_color, light.intensity(hit.normal));
                            depth_row[x] = hit.t;
                        }
                        None => {
                            color_row[x] = Self::sky_color(direction.y);
                            depth_row[x] = f32::INFINITY;
                        }
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3::Vec3;
    use crate::primitive::{Plane, Sphere};
    use approx::assert_relative_eq;

    const SIZE: u32 = 32;

    fn test_camera() -> Camera {
        Camera::new(Vec3::ZERO, Vec3::UP, 60.0, 1.0, 0.1, 100.0)
    }

    fn render_scene(scene: &Scene) -> FrameBuffer {
        let settings = RenderSettings::default();
        let pipeline = RayCastPipeline::new(&settings);
        let mut frame = FrameBuffer::new(SIZE, SIZE);
        pipeline.render(&test_camera(), scene, &mut frame);
        frame
    }

    #[test]
    fn center_pixel_hits_sphere_at_front_distance() {
        let mut scene = Scene::new();
        scene.add_primitive(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, 10.0),
            2.0,
            colors::RED,
        )));

        let frame = render_scene(&scene);
        let center = SIZE / 2;
        let (r, g, b) = colors::unpack_rgb(frame.pixel(center, center));
        assert!(r > 0 && g == 0 && b == 0, "sphere must shade red");
        // The central ray is nearly axis-aligned: hit distance is the
        // center distance minus the radius.
        assert_relative_eq!(frame.depth_at(center, center), 8.0, epsilon = 0.05);
    }

    #[test]
    fn closest_primitive_wins() {
        let mut scene = Scene::new();
        scene.add_primitive(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, 20.0),
            2.0,
            colors::BLUE,
        )));
        scene.add_primitive(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, 10.0),
            2.0,
            colors::RED,
        )));

        let frame = render_scene(&scene);
        let center = SIZE / 2;
        let (r, _, b) = colors::unpack_rgb(frame.pixel(center, center));
        assert!(r > 0 && b == 0, "nearer red sphere must occlude blue one");
    }

    #[test]
    fn misses_shade_the_sky_gradient() {
        let scene = Scene::new();
        let frame = render_scene(&scene);

        // Upward rays blend toward the zenith blue, downward rays toward
        // the white horizon: the top row must be bluer-than-red, the
        // bottom row brighter.
        let (top_r, _, top_b) = colors::unpack_rgb(frame.pixel(SIZE / 2, 0));
        let (bottom_r, _, _) = colors::unpack_rgb(frame.pixel(SIZE / 2, SIZE - 1));
        assert!(top_b > top_r);
        assert!(bottom_r > top_r);
        assert_eq!(frame.depth_at(SIZE / 2, 0), f32::INFINITY);
    }

    #[test]
    fn ground_plane_fills_the_lower_half() {
        let mut scene = Scene::new();
        scene.add_primitive(Box::new(Plane::new(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::UP,
            colors::GREEN,
        )));

        let frame = render_scene(&scene);
        // Downward rays hit the plane, upward rays see sky.
        let (_, bottom_g, _) = colors::unpack_rgb(frame.pixel(SIZE / 2, SIZE - 1));
        assert!(bottom_g > 0);
        assert!(frame.depth_at(SIZE / 2, SIZE - 1).is_finite());
        assert_eq!(frame.depth_at(SIZE / 2, 0), f32::INFINITY);
    }
}
