//! ARGB8888 color packing and shading helpers.
//!
//! The color buffer stores one `u32` per pixel in ARGB byte order, matching
//! the SDL streaming texture format the presentation layer uploads to. The
//! alpha byte is always 0xFF; only the low 24 bits carry color.

pub const BACKGROUND: u32 = 0xFF323232;
pub const WHITE: u32 = 0xFFFFFFFF;
pub const RED: u32 = 0xFFFF0000;
pub const GREEN: u32 = 0xFF00FF00;
pub const BLUE: u32 = 0xFF0000FF;

/// Pack 8-bit RGB channels into an ARGB u32 with full alpha.
#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Unpack an ARGB u32 into its 8-bit RGB channels.
#[inline]
pub const fn unpack_rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// Scale a color by a lighting intensity, clamping each channel to [0, 255].
#[inline]
pub fn modulate(color: u32, intensity: f32) -> u32 {
    let (r, g, b) = unpack_rgb(color);
    let scale = |c: u8| ((c as f32 * intensity).clamp(0.0, 255.0)) as u8;
    pack_rgb(scale(r), scale(g), scale(b))
}
