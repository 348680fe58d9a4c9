//! First-person camera.
//!
//! # Coordinate system
//!
//! The world is right-handed with Y up. At `yaw = 0, pitch = 0` the camera
//! looks along **+Z**; positive yaw turns right, positive pitch looks up.
//! View space puts the camera at the origin with +Z into the screen, so a
//! point's view-space z is its depth in front of the camera.
//!
//! # Caching
//!
//! The orthonormal basis and the view/projection matrices are derived
//! state, recomputed only by the mutation that invalidates them: movement
//! and rotation rebuild the view matrix (rotation also rebuilds the
//! basis), while FOV and aspect changes rebuild only the projection
//! matrix. A render pass therefore always reads matrices consistent with
//! the camera's position and orientation.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// Pitch stays this far away from straight up/down to dodge the gimbal
/// singularity where forward and world-up become parallel.
const PITCH_MARGIN: f32 = 1e-3;

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    yaw: f32,   // radians, unbounded
    pitch: f32, // radians, clamped to just inside +/- PI/2
    world_up: Vec3,

    fov_y: f32, // radians
    aspect_ratio: f32,
    near: f32,
    far: f32,

    forward: Vec3,
    right: Vec3,
    up: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    /// Creates a camera at `position` looking along +Z.
    ///
    /// `fov_degrees` is the vertical field of view; `aspect_ratio` is
    /// width over height of the render target.
    pub fn new(
        position: Vec3,
        world_up: Vec3,
        fov_degrees: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let fov_y = fov_degrees.to_radians();
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            world_up: world_up.normalize(),
            fov_y,
            aspect_ratio,
            near,
            far,
            forward: Vec3::FORWARD,
            right: Vec3::RIGHT,
            up: Vec3::UP,
            view: Mat4::identity(),
            projection: Mat4::perspective(fov_y, aspect_ratio, near, far),
        };
        camera.update_basis();
        camera.update_view();
        camera
    }

    // =========================================================================
    // Movement & rotation
    // =========================================================================

    /// Translates the camera along its own axes: `offset.x` along right,
    /// `offset.y` along the camera's local up, `offset.z` along forward.
    ///
    /// Vertical movement follows local up rather than world up, so moving
    /// "up" while pitched never produces sideways world drift.
    pub fn move_by(&mut self, offset: Vec3) {
        self.position = self.position
            + self.right * offset.x
            + self.up * offset.y
            + self.forward * offset.z;
        self.update_view();
    }

    /// Rotates by yaw (horizontal, positive = right) and pitch (vertical,
    /// positive = up) deltas.
    ///
    /// Yaw accumulates unbounded; the trigonometry wraps naturally. Pitch
    /// is clamped to just inside +/- 90 degrees.
    pub fn rotate(&mut self, dyaw: f32, dpitch: f32) {
        self.yaw += dyaw;
        let limit = std::f32::consts::FRAC_PI_2 - PITCH_MARGIN;
        self.pitch = (self.pitch + dpitch).clamp(-limit, limit);
        self.update_basis();
        self.update_view();
    }

    /// Sets the vertical field of view in degrees. Projection only.
    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov_y = fov_degrees.to_radians();
        self.update_projection();
    }

    /// Adapts the projection to a new render target size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect_ratio = width as f32 / height as f32;
        self.update_projection();
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    fn update_basis(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        self.forward = Vec3::new(yaw_sin * pitch_cos, pitch_sin, yaw_cos * pitch_cos);
        self.right = self.world_up.cross(self.forward).normalize();
        self.up = self.forward.cross(self.right).normalize();
    }

    /// View matrix = inverse of the camera's rigid transform: the basis
    /// vectors as rows (rotation transpose) with translation by -R*position.
    fn update_view(&mut self) {
        let r = self.right;
        let u = self.up;
        let f = self.forward;
        let p = self.position;
        self.view = Mat4::new([
            [r.x, r.y, r.z, -r.dot(p)],
            [u.x, u.y, u.z, -u.dot(p)],
            [f.x, f.y, f.z, -f.dot(p)],
            [0.0, 0.0, 0.0, 1.0],
        ]);
    }

    fn update_projection(&mut self) {
        self.projection = Mat4::perspective(self.fov_y, self.aspect_ratio, self.near, self.far);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }
}

// =============================================================================
// Camera Controller
// =============================================================================

/// Configuration and input handling for first-person camera movement.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Movement speed in units per second.
    pub move_speed: f32,
    /// Mouse sensitivity in radians per pixel.
    pub look_sensitivity: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            look_sensitivity: 0.002,
        }
    }
}

impl CameraController {
    pub fn new(move_speed: f32, look_sensitivity: f32) -> Self {
        Self {
            move_speed,
            look_sensitivity,
        }
    }

    /// Updates the camera based on input state.
    ///
    /// # Input Mapping
    /// - W/S: Move forward/backward
    /// - A/D: Strafe left/right
    /// - Space/Shift: Move up/down
    /// - Mouse: Look around (when captured)
    pub fn update(
        &self,
        camera: &mut Camera,
        input: &crate::window::InputState,
        delta_time: f32,
    ) {
        let move_amount = self.move_speed * delta_time;

        let mut offset = Vec3::ZERO;
        if input.forward {
            offset.z += move_amount;
        }
        if input.back {
            offset.z -= move_amount;
        }
        if input.right {
            offset.x += move_amount;
        }
        if input.left {
            offset.x -= move_amount;
        }
        if input.up {
            offset.y += move_amount;
        }
        if input.down {
            offset.y -= move_amount;
        }
        if offset != Vec3::ZERO {
            camera.move_by(offset);
        }

        let (dx, dy) = input.mouse_delta;
        if dx != 0 || dy != 0 {
            // Dragging the mouse down yields positive yrel but looks down,
            // so the pitch delta is negated.
            camera.rotate(
                dx as f32 * self.look_sensitivity,
                -(dy as f32) * self.look_sensitivity,
            );
        }
    }
}
