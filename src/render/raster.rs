//! Triangle rasterization pipeline.
//!
//! Per frame, every mesh vertex runs through the transform chain
//! world -> view -> clip -> NDC -> screen, then each triangle is culled,
//! rasterized over its bounding box with edge functions, depth-tested
//! against view-space z and shaded with interpolated vertex normals.
//!
//! # Edge function
//!
//! For an edge from A to B the edge function at P is the 2D cross product
//! `(B - A) x (P - A)`, positive when P lies to the left of the edge.
//! Evaluated for all three edges it yields both the inside test and, after
//! dividing by the total signed area, the barycentric weights used for
//! every attribute interpolation.
//!
//! # Winding and culling
//!
//! Meshes are wound counter-clockwise seen from outside. The screen-space
//! Y flip inverts orientation, so front-facing triangles come out with
//! *positive* signed area here; anything with area <= epsilon (back faces
//! and degenerate slivers alike) is culled before rasterization.
//!
//! Triangles straddling the near plane are rejected whole rather than
//! clipped, which can pop geometry that comes very close to the camera.

use rayon::prelude::*;

use super::{FrameBuffer, RenderPipeline};
use crate::camera::Camera;
use crate::colors;
use crate::light::DirectionalLight;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::mesh::Mesh;
use crate::scene::Scene;
use crate::settings::RenderSettings;

/// Minimum magnitude for the perspective-divide denominator.
const CLIP_W_EPSILON: f32 = 1e-6;

/// Signed areas at or below this are culled as back-facing or degenerate.
const AREA_EPSILON: f32 = 1e-6;

/// A triangle that survived culling, ready for per-row rasterization.
struct PreparedTriangle {
    /// Screen-space vertex positions (pixel coordinates).
    screen: [[f32; 2]; 3],
    /// View-space z per vertex, interpolated for the depth test.
    depths: [f32; 3],
    /// World-space vertex normals, interpolated for shading.
    normals: [Vec3; 3],
    color: u32,
    inv_area: f32,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

pub struct RasterPipeline {
    light: DirectionalLight,
    background: u32,
}

impl RasterPipeline {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            light: DirectionalLight::new(settings.light_direction, settings.ambient),
            background: settings.background,
        }
    }

    /// 2D cross product `(B - A) x (P - A)`: positive when P lies to the
    /// left of the edge A -> B.
    #[inline]
    fn edge_function(a: [f32; 2], b: [f32; 2], px: f32, py: f32) -> f32 {
        (b[0] - a[0]) * (py - a[1]) - (b[1] - a[1]) * (px - a[0])
    }

    /// Perspective divide and viewport mapping for one clip-space vertex.
    ///
    /// Near-rejected triangles never reach rasterization, but the clamped
    /// denominator keeps stray vertices at w ~ 0 finite instead of
    /// spraying inf/NaN through the bounding-box math.
    fn clip_to_screen(clip: Vec4, width: u32, height: u32) -> [f32; 2] {
        let mut w = clip.w;
        if w.abs() < CLIP_W_EPSILON {
            w = if w < 0.0 {
                -CLIP_W_EPSILON
            } else {
                CLIP_W_EPSILON
            };
        }

        let ndc_x = clip.x / w;
        let ndc_y = clip.y / w;
        // Screen origin is top-left, NDC Y points up: flip Y.
        let screen_x = (ndc_x * 0.5 + 0.5) * (width - 1) as f32;
        let screen_y = (-ndc_y * 0.5 + 0.5) * (height - 1) as f32;
        [screen_x, screen_y]
    }

    /// Transforms one mesh and collects its visible triangles.
    fn prepare_mesh(
        mesh: &Mesh,
        camera: &Camera,
        width: u32,
        height: u32,
        out: &mut Vec<PreparedTriangle>,
    ) {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let near = camera.near();

        // Transform every vertex once, shared by all triangles that use it.
        let transformed: Vec<([f32; 2], f32)> = mesh
            .vertices()
            .iter()
            .map(|&vertex| {
                let view_point = view * Vec4::from(vertex);
                let clip = projection * view_point;
                (Self::clip_to_screen(clip, width, height), view_point.z)
            })
            .collect();

        let normals = mesh.normals();
        for (index, tri) in mesh.triangles().iter().enumerate() {
            let [a, b, c] = *tri;
            let (sa, da) = transformed[a];
            let (sb, db) = transformed[b];
            let (sc, dc) = transformed[c];

            // Near-plane rejection: no clipping, whole triangle discarded.
            if da <= near || db <= near || dc <= near {
                continue;
            }

            // Backface/degenerate culling by screen-space signed area.
            let area = Self::edge_function(sa, sb, sc[0], sc[1]);
            if area <= AREA_EPSILON {
                continue;
            }

            // Integer pixel bounding box, clamped to the buffer.
            let min_x = (sa[0].min(sb[0]).min(sc[0]).floor() as i32).max(0);
            let max_x = (sa[0].max(sb[0]).max(sc[0]).ceil() as i32).min(width as i32 - 1);
            let min_y = (sa[1].min(sb[1]).min(sc[1]).floor() as i32).max(0);
            let max_y = (sa[1].max(sb[1]).max(sc[1]).ceil() as i32).min(height as i32 - 1);
            if min_x > max_x || min_y > max_y {
                continue;
            }

            out.push(PreparedTriangle {
                screen: [sa, sb, sc],
                depths: [da, db, dc],
                normals: [normals[a], normals[b], normals[c]],
                color: mesh.color().color_of(index),
                inv_area: 1.0 / area,
                min_x,
                max_x,
                min_y,
                max_y,
            });
        }
    }

    fn prepare_scene(camera: &Camera, scene: &Scene, width: u32, height: u32) -> Vec<PreparedTriangle> {
        let mut prepared = Vec::new();
        for mesh in scene.meshes() {
            Self::prepare_mesh(mesh, camera, width, height, &mut prepared);
        }
        prepared
    }
}

impl RenderPipeline for RasterPipeline {
    fn render(&self, camera: &Camera, scene: &Scene, frame: &mut FrameBuffer) {
        frame.clear(self.background);

        let width = frame.width();
        let height = frame.height();
        let prepared = Self::prepare_scene(camera, scene, width, height);
        if prepared.is_empty() {
            return;
        }

        let light = self.light;

        // Row-partitioned fill: each rayon task owns complete rows of the
        // color and depth buffers, so the depth-test-then-write pair needs
        // no synchronization.
        frame.par_rows_mut().enumerate().for_each(|(y, (color_row, depth_row))| {
            let y = y as i32;
            let py = y as f32 + 0.5;
            for tri in &prepared {
                if y < tri.min_y || y > tri.max_y {
                    continue;
                }
                let [sa, sb, sc] = tri.screen;
                for x in tri.min_x..=tri.max_x {
                    let px = x as f32 + 0.5;

                    let w0 = Self::edge_function(sb, sc, px, py);
                    let w1 = Self::edge_function(sc, sa, px, py);
                    let w2 = Self::edge_function(sa, sb, px, py);
                    if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                        continue;
                    }

                    let l0 = w0 * tri.inv_area;
                    let l1 = w1 * tri.inv_area;
                    let l2 = w2 * tri.inv_area;

                    // View-space depth, interpolated with the same weights.
                    let depth = l0 * tri.depths[0] + l1 * tri.depths[1] + l2 * tri.depths[2];
                    let idx = x as usize;
                    if depth >= depth_row[idx] {
                        continue;
                    }

                    let normal = (tri.normals[0] * l0
                        + tri.normals[1] * l1
                        + tri.normals[2] * l2)
                        .normalize();
                    let intensity = light.intensity(normal);

                    depth_row[idx] = depth;
                    color_row[idx] = colors::modulate(tri.color, intensity);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshColor;

    const SIZE: u32 = 64;

    fn test_settings() -> RenderSettings {
        RenderSettings::default()
    }

    fn test_camera() -> Camera {
        Camera::new(Vec3::ZERO, Vec3::UP, 60.0, 1.0, 0.1, 100.0)
    }

    fn render_scene(camera: &Camera, scene: &Scene) -> FrameBuffer {
        let settings = test_settings();
        let pipeline = RasterPipeline::new(&settings);
        let mut frame = FrameBuffer::new(SIZE, SIZE);
        pipeline.render(camera, scene, &mut frame);
        frame
    }

    fn foreground_bounds(frame: &FrameBuffer, background: u32) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.pixel(x, y) != background {
                    bounds = Some(match bounds {
                        None => (x, x, y, y),
                        Some((x0, x1, y0, y1)) => {
                            (x0.min(x), x1.max(x), y0.min(y), y1.max(y))
                        }
                    });
                }
            }
        }
        bounds
    }

    /// A triangle whose face normal points away from a camera at the origin.
    fn backfacing_triangle() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, 5.0),
                Vec3::new(0.0, 1.0, 5.0),
                Vec3::new(1.0, -1.0, 5.0),
            ],
            // Reversed winding: face normal points to +z, away from origin
            vec![[0, 2, 1]],
            MeshColor::Uniform(colors::RED),
        )
        .unwrap()
    }

    /// A triangle facing a camera at the origin (normal toward -z).
    fn frontfacing_triangle(z: f32, color: u32) -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(-2.0, -2.0, z),
                Vec3::new(0.0, 2.0, z),
                Vec3::new(2.0, -2.0, z),
            ],
            vec![[0, 1, 2]],
            MeshColor::Uniform(color),
        )
        .unwrap()
    }

    #[test]
    fn backfacing_triangle_writes_no_pixels() {
        let camera = test_camera();
        let mut scene = Scene::new();
        scene.add_mesh(backfacing_triangle());

        let frame = render_scene(&camera, &scene);
        assert!(foreground_bounds(&frame, test_settings().background).is_none());
    }

    #[test]
    fn backfacing_triangle_is_culled_before_rasterization() {
        let camera = test_camera();
        let mut scene = Scene::new();
        scene.add_mesh(backfacing_triangle());
        let prepared = RasterPipeline::prepare_scene(&camera, &scene, SIZE, SIZE);
        assert!(prepared.is_empty());
    }

    #[test]
    fn clip_to_screen_stays_finite_at_zero_w() {
        // A vertex on the camera plane projects to w = 0; the clamped
        // divide must yield finite (if huge) screen coordinates.
        for clip in [
            Vec4::new(1.0, 1.0, 0.0, 0.0),
            Vec4::new(-0.5, 2.0, 0.0, 1e-9),
            Vec4::new(0.3, -0.7, 0.0, -1e-9),
        ] {
            let [sx, sy] = RasterPipeline::clip_to_screen(clip, SIZE, SIZE);
            assert!(sx.is_finite(), "screen x not finite for {clip:?}");
            assert!(sy.is_finite(), "screen y not finite for {clip:?}");
        }
    }

    #[test]
    fn triangle_touching_the_camera_plane_is_rejected_whole() {
        // One vertex at view z = 0, the other two well in front: no
        // clipping, the entire triangle is discarded before rasterization.
        let camera = test_camera();
        let mut scene = Scene::new();
        scene.add_mesh(
            Mesh::new(
                vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(-2.0, -2.0, 5.0),
                    Vec3::new(2.0, -2.0, 5.0),
                ],
                vec![[0, 2, 1]],
                MeshColor::Uniform(colors::RED),
            )
            .unwrap(),
        );

        let prepared = RasterPipeline::prepare_scene(&camera, &scene, SIZE, SIZE);
        assert!(prepared.is_empty());

        let frame = render_scene(&camera, &scene);
        assert!(foreground_bounds(&frame, test_settings().background).is_none());
    }

    #[test]
    fn depth_test_keeps_nearer_triangle_either_draw_order() {
        let camera = test_camera();
        let settings = test_settings();
        let near_color = colors::modulate(
            colors::GREEN,
            DirectionalLight::new(settings.light_direction, settings.ambient)
                .intensity(Vec3::new(0.0, 0.0, -1.0)),
        );

        for order in [false, true] {
            let mut scene = Scene::new();
            if order {
                scene.add_mesh(frontfacing_triangle(5.0, colors::GREEN));
                scene.add_mesh(frontfacing_triangle(8.0, colors::BLUE));
            } else {
                scene.add_mesh(frontfacing_triangle(8.0, colors::BLUE));
                scene.add_mesh(frontfacing_triangle(5.0, colors::GREEN));
            }

            let frame = render_scene(&camera, &scene);
            // Both triangles cover the buffer center; green at z=5 must win.
            assert_eq!(frame.pixel(SIZE / 2, SIZE / 2), near_color);
        }
    }

    #[test]
    fn cube_ahead_renders_centered_square_silhouette() {
        // Camera at the origin looking down +Z, unit cube at (0,0,5):
        // only the near face survives culling (the four side faces invert
        // their winding in projection, the far face points away), so
        // exactly two triangles reach the rasterizer.
        let camera = test_camera();
        let mut scene = Scene::new();
        let cube = Mesh::cube(Vec3::ZERO, 1.0, MeshColor::Uniform(colors::RED)).unwrap();
        scene.add_mesh(cube.translated(Vec3::new(0.0, 0.0, 5.0)));

        let prepared = RasterPipeline::prepare_scene(&camera, &scene, SIZE, SIZE);
        assert_eq!(prepared.len(), 2);

        let frame = render_scene(&camera, &scene);
        let (x0, x1, y0, y1) =
            foreground_bounds(&frame, test_settings().background).expect("cube must be visible");

        // Roughly square...
        let width = x1 - x0 + 1;
        let height = y1 - y0 + 1;
        assert!(width.abs_diff(height) <= 2, "{width}x{height} not square");
        // ...and centered in the frame.
        let center = (SIZE - 1) / 2;
        assert!(((x0 + x1) / 2).abs_diff(center) <= 2);
        assert!(((y0 + y1) / 2).abs_diff(center) <= 2);
        // Background everywhere outside the silhouette.
        assert_eq!(frame.pixel(1, 1), test_settings().background);
        assert_ne!(frame.pixel(SIZE / 2, SIZE / 2), test_settings().background);
    }

    #[test]
    fn cube_seen_from_an_angle_shows_three_faces() {
        // Off-axis above and to the side: three faces of the cube front-face
        // the camera, six triangles survive culling.
        let mut camera = Camera::new(
            Vec3::new(3.0, 3.0, -3.0),
            Vec3::UP,
            60.0,
            1.0,
            0.1,
            100.0,
        );
        // Aim at the cube center at (0,0,5): direction (-3,-3,8) gives
        // yaw = atan2(-3, 8), pitch = asin(-3 / |(-3,-3,8)|).
        camera.rotate(-0.3588, -0.3377);

        let mut scene = Scene::new();
        let cube = Mesh::cube(Vec3::ZERO, 1.0, MeshColor::Uniform(colors::RED)).unwrap();
        scene.add_mesh(cube.translated(Vec3::new(0.0, 0.0, 5.0)));

        let prepared = RasterPipeline::prepare_scene(&camera, &scene, SIZE, SIZE);
        assert_eq!(prepared.len(), 6);
    }

    #[test]
    fn half_turn_yaw_puts_geometry_behind_the_camera() {
        let mut camera = test_camera();
        let mut scene = Scene::new();
        let cube = Mesh::cube(Vec3::ZERO, 1.0, MeshColor::Uniform(colors::RED)).unwrap();
        scene.add_mesh(cube.translated(Vec3::new(0.0, 0.0, 5.0)));

        camera.rotate(std::f32::consts::PI, 0.0);
        let prepared = RasterPipeline::prepare_scene(&camera, &scene, SIZE, SIZE);
        assert!(prepared.is_empty());

        let frame = render_scene(&camera, &scene);
        assert!(foreground_bounds(&frame, test_settings().background).is_none());
    }

    #[test]
    fn per_triangle_colors_reach_the_buffer() {
        let camera = test_camera();
        let mut scene = Scene::new();
        let mut triangle_colors = vec![colors::RED; 12];
        // Near face of the translated cube is triangles 2 and 3.
        triangle_colors[2] = colors::GREEN;
        triangle_colors[3] = colors::GREEN;
        let cube = Mesh::cube(Vec3::ZERO, 1.0, MeshColor::PerTriangle(triangle_colors)).unwrap();
        scene.add_mesh(cube.translated(Vec3::new(0.0, 0.0, 5.0)));

        let frame = render_scene(&camera, &scene);
        let center = frame.pixel(SIZE / 2, SIZE / 2);
        let (r, g, _) = colors::unpack_rgb(center);
        assert!(g > 0 && r == 0, "expected a green-shaded face");
    }
}
