//! Output pixel buffer and the linear-to-display transfer curve.

use glint_math::Vec4;

/// Convert a linear-light channel to an 8-bit sRGB-encoded value.
///
/// Exact piecewise sRGB curve: linear below 0.0031308, a 1/2.4 power
/// above, rounded to the nearest integer. The input must already be
/// clamped to [0, 1].
#[inline]
pub fn linear_to_srgb(value: f32) -> u8 {
    if value < 0.0031308 {
        (255.0 * 12.92 * value + 0.5) as u8
    } else {
        (255.0 * (1.055 * value.powf(1.0 / 2.4) - 0.055) + 0.5) as u8
    }
}

/// Convert an 8-bit sRGB-encoded value back to linear light.
#[inline]
pub fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v < 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode a linear-light color as one opaque display texel.
///
/// Channels are clamped to [0, 1], RGB is sRGB-encoded, and alpha is
/// forced to 255 regardless of the accumulated value.
#[inline]
pub fn encode(color: Vec4) -> [u8; 4] {
    let c = color.clamp(Vec4::ZERO, Vec4::ONE);
    [
        linear_to_srgb(c.x),
        linear_to_srgb(c.y),
        linear_to_srgb(c.z),
        255,
    ]
}

/// A width x height grid of RGBA8 texels.
///
/// The renderer writes rows as they finish; a host display pass reads
/// whatever is there. Consistency between the two is handled by the
/// orchestrator, which only hands out the buffer behind a lock.
#[derive(Clone, Debug, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

/// Opaque black, the cleared state of every frame.
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

impl Framebuffer {
    /// Create a buffer cleared to opaque black.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resize, destroying any contents.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, BLACK);
    }

    /// Fill every texel.
    pub fn clear(&mut self, texel: [u8; 4]) {
        self.pixels.fill(texel);
    }

    /// Get the texel at (x, y).
    pub fn get(&self, x: usize, y: usize) -> [u8; 4] {
        self.pixels[y * self.width + x]
    }

    /// Overwrite one row with already-encoded texels.
    ///
    /// `row` must hold exactly `width` texels.
    pub fn write_row(&mut self, y: usize, row: &[[u8; 4]]) {
        debug_assert_eq!(row.len(), self.width);
        let start = y * self.width;
        self.pixels[start..start + self.width].copy_from_slice(row);
    }

    /// The raw texel grid, row-major.
    pub fn as_raw(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Flatten to an RGBA byte vector (for display upload or saving).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for texel in &self.pixels {
            bytes.extend_from_slice(texel);
        }
        bytes
    }
}
