//! ARGB8888 color helpers.
//!
//! Colors travel through the pipeline packed as `0xAARRGGBB`, the layout the
//! color buffer stores directly.

pub const BACKGROUND: u32 = 0xFF000000;
pub const STAR: u32 = 0xFFFFFFFF;
pub const CHECKER_LIGHT: u32 = 0xFFE0E0E0;
pub const CHECKER_DARK: u32 = 0xFF3050A0;

/// Unpack into normalized (r, g, b, a) channels.
#[inline]
pub fn unpack_rgba(color: u32) -> (f32, f32, f32, f32) {
    let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    (channel(16), channel(8), channel(0), channel(24))
}

/// Pack normalized channels, clamping each to [0, 1].
#[inline]
pub fn pack_rgba(r: f32, g: f32, b: f32, a: f32) -> u32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(a) << 24) | (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

/// Per-channel linear interpolation between two packed colors.
#[inline]
pub fn lerp_color(a: u32, b: u32, t: f32) -> u32 {
    let (r0, g0, b0, a0) = unpack_rgba(a);
    let (r1, g1, b1, a1) = unpack_rgba(b);
    pack_rgba(
        r0 + (r1 - r0) * t,
        g0 + (g1 - g0) * t,
        b0 + (b1 - b0) * t,
        a0 + (a1 - a0) * t,
    )
}

/// Reorder `0xAARRGGBB` into the RGBA byte order image encoders expect.
#[inline]
pub fn to_rgba_bytes(color: u32) -> [u8; 4] {
    let [a, r, g, b] = color.to_be_bytes();
    [r, g, b, a]
}

/// Inverse of [`to_rgba_bytes`].
#[inline]
pub fn from_rgba_bytes([r, g, b, a]: [u8; 4]) -> u32 {
    u32::from_be_bytes([a, r, g, b])
}
