//! Static render configuration, read once at setup.

use crate::colors;
use crate::math::vec3::Vec3;

/// Everything the pipelines need beyond camera and scene.
///
/// Built once before the first frame; nothing re-reads external state at
/// render time. `quality` decouples the internal render resolution from
/// the display resolution: buffers are sized `display * quality` and the
/// presentation layer upscales.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Direction the light travels; the pipelines normalize it at setup.
    pub light_direction: Vec3,
    /// Ambient floor in [0, 1].
    pub ambient: f32,
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Internal render resolution factor, 0 < quality <= 1.
    pub quality: f32,
    pub background: u32,
    pub world_up: Vec3,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            light_direction: Vec3::new(0.3, -0.8, 0.5),
            ambient: 0.25,
            near: 0.1,
            far: 100.0,
            fov_degrees: 60.0,
            quality: 0.5,
            background: colors::BACKGROUND,
            world_up: Vec3::UP,
        }
    }
}

impl RenderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Internal buffer dimensions for a display of the given size.
    ///
    /// Clamped to at least 1x1 so a tiny window or an aggressive quality
    /// factor can never produce an empty buffer.
    pub fn internal_size(&self, display_width: u32, display_height: u32) -> (u32, u32) {
        debug_assert!(self.quality > 0.0 && self.quality <= 1.0);
        let w = ((display_width as f32 * self.quality) as u32).max(1);
        let h = ((display_height as f32 * self.quality) as u32).max(1);
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_size_scales_by_quality() {
        let settings = RenderSettings {
            quality: 0.5,
            ..RenderSettings::default()
        };
        assert_eq!(settings.internal_size(800, 600), (400, 300));
    }

    #[test]
    fn internal_size_never_collapses_to_zero() {
        let settings = RenderSettings {
            quality: 0.01,
            ..RenderSettings::default()
        };
        assert_eq!(settings.internal_size(10, 10), (1, 1));
    }
}
