//! Color and depth buffers at the internal render resolution.

use rayon::prelude::*;

/// Owned color (ARGB8888) and depth grids, one entry per pixel.
///
/// The depth buffer stores view-space z: the distance in front of the
/// camera, not NDC depth, so depth comparisons keep full float precision
/// across the whole clip range. Smaller values are closer; cleared depth
/// is `+inf` (nothing drawn).
pub struct FrameBuffer {
    color: Vec<u32>,
    depth: Vec<f32>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color: vec![0; size],
            depth: vec![f32::INFINITY; size],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = (width * height) as usize;
        self.color = vec![0; size];
        self.depth = vec![f32::INFINITY; size];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resets every pixel to the background color and every depth to
    /// infinity. Called at the start of each frame; nothing persists
    /// across frames.
    pub fn clear(&mut self, background: u32) {
        self.color.fill(background);
        self.depth.fill(f32::INFINITY);
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.color[(y * self.width + x) as usize]
    }

    #[inline]
    pub fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.depth[(y * self.width + x) as usize]
    }

    /// Parallel iterator over (color row, depth row) pairs.
    ///
    /// Each row is handed to exactly one rayon task, so pipelines can
    /// depth-test and write without any cross-thread pixel sharing.
    pub fn par_rows_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = (&mut [u32], &mut [f32])> + '_ {
        let width = self.width as usize;
        self.color
            .par_chunks_mut(width)
            .zip(self.depth.par_chunks_mut(width))
    }

    /// The color buffer as raw bytes for the SDL streaming texture.
    pub fn as_bytes(&self) -> &[u8] {
        // Vec<u32> is 4-byte aligned and densely packed; reinterpreting as
        // bytes is sound.
        unsafe {
            std::slice::from_raw_parts(self.color.as_ptr() as *const u8, self.color.len() * 4)
        }
    }
}

#[cfg(test)]
impl FrameBuffer {
    /// Write a pixel if `depth` is closer than what is already stored.
    /// Out-of-bounds coordinates are silently ignored.
    ///
    /// The pipelines write through [`FrameBuffer::par_rows_mut`]; this
    /// exists only so tests can exercise the depth-buffer semantics
    /// pixel by pixel.
    fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let idx = (y as u32 * self.width + x as u32) as usize;
            if depth < self.depth[idx] {
                self.depth[idx] = depth;
                self.color[idx] = color;
            }
        }
    }
}
