//! Frame rendering.
//!
//! Two pipeline strategies produce a frame from the same inputs: the
//! triangle [`raster`] pipeline and the per-pixel [`raycast`] pipeline.
//! Both implement [`RenderPipeline`]; the [`PipelineDispatcher`] selects
//! one per frame, never mixing the two within a frame.

pub mod framebuffer;
pub mod raster;
pub mod raycast;

pub use framebuffer::FrameBuffer;
pub use raster::RasterPipeline;
pub use raycast::RayCastPipeline;

use crate::camera::Camera;
use crate::scene::Scene;
use crate::settings::RenderSettings;

/// The "render one frame" contract.
///
/// A pipeline reads an immutable camera/scene snapshot and fills a
/// complete color (and depth) buffer. It never fails mid-frame; numerical
/// edge cases degrade to fallback pixels instead.
pub trait RenderPipeline {
    fn render(&self, camera: &Camera, scene: &Scene, frame: &mut FrameBuffer);
}

/// Available rendering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineKind {
    /// Per-triangle rasterization with a z-buffer. Scales with triangle
    /// count; the default for mesh scenes.
    #[default]
    Raster,
    /// Per-pixel ray casting against analytic primitives. Cost grows with
    /// resolution times primitive count; only sensible for small scenes.
    RayCast,
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineKind::Raster => write!(f, "Raster"),
            PipelineKind::RayCast => write!(f, "RayCast"),
        }
    }
}

/// Holds both pipelines and dispatches to the active one.
pub struct PipelineDispatcher {
    raster: RasterPipeline,
    raycast: RayCastPipeline,
    active: PipelineKind,
}

impl PipelineDispatcher {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            raster: RasterPipeline::new(settings),
            raycast: RayCastPipeline::new(settings),
            active: PipelineKind::default(),
        }
    }

    pub fn set_kind(&mut self, kind: PipelineKind) {
        self.active = kind;
    }

    pub fn kind(&self) -> PipelineKind {
        self.active
    }
}

impl RenderPipeline for PipelineDispatcher {
    #[inline]
    fn render(&self, camera: &Camera, scene: &Scene, frame: &mut FrameBuffer) {
        match self.active {
            PipelineKind::Raster => self.raster.render(camera, scene, frame),
            PipelineKind::RayCast => self.raycast.render(camera, scene, frame),
        }
    }
}
