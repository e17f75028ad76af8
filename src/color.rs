//! Packed RGBA color.
//!
//! A [`Color`] stores four 8-bit channels in one `u32`, red in the least
//! significant byte and alpha in the most significant one. On little-endian
//! targets the in-memory byte order is therefore R, G, B, A, which is what the
//! vertex attribute pointers for `a_color` expect (4 normalized unsigned bytes).

use thiserror::Error;

/// Error returned when a float channel lies outside `[0.0, 1.0]` (or is NaN).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ColorError {
    #[error("color channel {channel} out of range [0, 1]: {value}")]
    OutOfRange { channel: char, value: f32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Color(u32);

const R_SHIFT: u32 = 0;
const G_SHIFT: u32 = 8;
const B_SHIFT: u32 = 16;
const A_SHIFT: u32 = 24;

impl Color {
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    pub const BLACK: Self = Self(0xFF00_0000);
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    pub const RED: Self = Self(0xFF00_00FF);
    pub const GREEN: Self = Self(0xFF00_FF00);
    pub const BLUE: Self = Self(0xFFFF_0000);

    /// Wraps a raw packed value (`0xAABBGGRR`).
    pub const fn from_packed(rgba: u32) -> Self {
        Self(rgba)
    }

    /// Builds a color from four normalized channels.
    ///
    /// Every channel must lie in `[0.0, 1.0]`; anything else is rejected.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Result<Self, ColorError> {
        let packed = (quantize('r', r)? << R_SHIFT)
            | (quantize('g', g)? << G_SHIFT)
            | (quantize('b', b)? << B_SHIFT)
            | (quantize('a', a)? << A_SHIFT);
        Ok(Self(packed))
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub fn r(self) -> f32 {
        self.channel(R_SHIFT)
    }

    pub fn g(self) -> f32 {
        self.channel(G_SHIFT)
    }

    pub fn b(self) -> f32 {
        self.channel(B_SHIFT)
    }

    pub fn a(self) -> f32 {
        self.channel(A_SHIFT)
    }

    pub fn set_r(&mut self, r: f32) -> Result<(), ColorError> {
        self.set_channel(R_SHIFT, quantize('r', r)?);
        Ok(())
    }

    pub fn set_g(&mut self, g: f32) -> Result<(), ColorError> {
        self.set_channel(G_SHIFT, quantize('g', g)?);
        Ok(())
    }

    pub fn set_b(&mut self, b: f32) -> Result<(), ColorError> {
        self.set_channel(B_SHIFT, quantize('b', b)?);
        Ok(())
    }

    pub fn set_a(&mut self, a: f32) -> Result<(), ColorError> {
        self.set_channel(A_SHIFT, quantize('a', a)?);
        Ok(())
    }

    /// All four channels as floats, in the order a `vec4` uniform expects.
    pub fn to_array(self) -> [f32; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }

    #[inline]
    fn channel(self, shift: u32) -> f32 {
        ((self.0 >> shift) & 0xFF) as f32 / 255.0
    }

    #[inline]
    fn set_channel(&mut self, shift: u32, value: u32) {
        self.0 = (self.0 & !(0xFF << shift)) | (value << shift);
    }
}

/// Converts a normalized float to an 8-bit channel, truncating like `floor(v * 255)`.
fn quantize(channel: char, value: f32) -> Result<u32, ColorError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ColorError::OutOfRange { channel, value });
    }
    Ok((value * 255.0) as u32)
}
