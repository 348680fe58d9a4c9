//! A CPU-based software-rendered 3D graphics engine.
//!
//! This crate renders triangle meshes with a z-buffered rasterizer and
//! analytic primitives with a per-pixel ray caster, selectable at runtime.
//! SDL2 is used only for window management and display; every pixel is
//! produced on the CPU.
//!
//! # Quick Start
//!
//! ```ignore
//! use rendu::prelude::*;
//!
//! let settings = RenderSettings::default();
//! let mut scene = Scene::new();
//! scene.add_mesh(Mesh::cube(Vec3::new(0.0, 0.0, 5.0), 2.0, MeshColor::Uniform(colors::RED))?);
//!
//! let mut frame = FrameBuffer::new(800, 600);
//! let camera = Camera::new(Vec3::ZERO, settings.world_up, 60.0, 800.0 / 600.0, 0.1, 100.0);
//! PipelineDispatcher::new(&settings).render(&camera, &scene, &mut frame);
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod light;
pub mod loader;
pub mod math;
pub mod mesh;
pub mod primitive;
pub mod render;
pub mod scene;
pub mod settings;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use camera::{Camera, CameraController};
pub use mesh::{Mesh, MeshColor, MeshError};
pub use render::{FrameBuffer, PipelineDispatcher, PipelineKind, RenderPipeline};
pub use scene::Scene;
pub use settings::RenderSettings;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use rendu::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, CameraController};

    // Scene & geometry
    pub use crate::light::DirectionalLight;
    pub use crate::mesh::{Mesh, MeshColor, MeshError};
    pub use crate::primitive::{Hit, Intersect, Plane, Sphere};
    pub use crate::scene::Scene;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Rendering
    pub use crate::render::{
        FrameBuffer, PipelineDispatcher, PipelineKind, RasterPipeline, RayCastPipeline,
        RenderPipeline,
    };
    pub use crate::settings::RenderSettings;

    // Colors
    pub use crate::colors;

    // Window & Input
    pub use crate::window::{FrameLimiter, InputState, Window, WindowEvent};
}
