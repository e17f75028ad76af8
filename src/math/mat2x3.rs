//! 2×3 affine transformation matrix using the row-vector convention.
//!
//! # Convention
//! - Vectors are **row vectors** on the left: `v * M`
//! - `row1` and `row2` hold the 2×2 linear part, `delta` the translation
//! - Transforms chain **left-to-right**: `A * B` applies A first, then B
//!
//! ```text
//!             | row1.x  row1.y |
//! [x y 1]  *  | row2.x  row2.y |  =  [x' y']
//!             | delta.x delta.y|
//! ```
//!
//! # Example
//! ```ignore
//! // rotate first, then scale, then move
//! let m = Mat2x3::rotate(30.0) * Mat2x3::scale(0.25) * Mat2x3::translation(offset);
//! ```

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use super::vec2::Vec2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mat2x3 {
    pub row1: Vec2,
    pub row2: Vec2,
    pub delta: Vec2,
}

impl Mat2x3 {
    pub const fn new(row1: Vec2, row2: Vec2, delta: Vec2) -> Self {
        Self { row1, row2, delta }
    }

    pub fn identity() -> Self {
        Self::scale(1.0)
    }

    /// Creates a uniform scale matrix.
    pub fn scale(factor: f32) -> Self {
        Self::scale_xy(factor, factor)
    }

    /// Creates a non-uniform scale matrix, e.g. for aspect-ratio correction.
    pub fn scale_xy(sx: f32, sy: f32) -> Self {
        Self::new(Vec2::new(sx, 0.0), Vec2::new(0.0, sy), Vec2::ZERO)
    }

    /// Creates a rotation matrix. The angle is given in **degrees**.
    pub fn rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(Vec2::new(cos, -sin), Vec2::new(sin, cos), Vec2::ZERO)
    }

    /// Creates a translation matrix.
    pub fn translation(delta: Vec2) -> Self {
        Self {
            delta,
            ..Self::identity()
        }
    }

    /// Transforms a point: linear part plus translation.
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        p * *self + self.delta
    }

    /// Packs the matrix into a 3×3 in column-major order, bottom row `(0, 0, 1)`.
    ///
    /// This is the layout uploaded to `mat3` uniforms without transposition.
    #[rustfmt::skip]
    pub fn to_column_major(&self) -> [f32; 9] {
        [
            self.row1.x, self.row2.x, self.delta.x,
            self.row1.y, self.row2.y, self.delta.y,
            0.0, 0.0, 1.0,
        ]
    }
}

/// Affine composition: `A * B` applies A first, then B.
impl Mul<Mat2x3> for Mat2x3 {
    type Output = Mat2x3;

    fn mul(self, rhs: Mat2x3) -> Self::Output {
        Mat2x3 {
            row1: Vec2::new(
                self.row1.x * rhs.row1.x + self.row1.y * rhs.row2.x,
                self.row1.x * rhs.row1.y + self.row1.y * rhs.row2.y,
            ),
            row2: Vec2::new(
                self.row2.x * rhs.row1.x + self.row2.y * rhs.row2.x,
                self.row2.x * rhs.row1.y + self.row2.y * rhs.row2.y,
            ),
            delta: Vec2::new(
                self.delta.x * rhs.row1.x + self.delta.y * rhs.row2.x + rhs.delta.x,
                self.delta.x * rhs.row1.y + self.delta.y * rhs.row2.y + rhs.delta.y,
            ),
        }
    }
}

/// Transform a direction: `v * M` uses the linear part only (no translation).
impl Mul<Mat2x3> for Vec2 {
    type Output = Vec2;

    fn mul(self, m: Mat2x3) -> Self::Output {
        Vec2::new(
            self.x * m.row1.x + self.y * m.row2.x,
            self.x * m.row1.y + self.y * m.row2.y,
        )
    }
}

impl AbsDiffEq for Mat2x3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.row1.abs_diff_eq(&other.row1, epsilon)
            && self.row2.abs_diff_eq(&other.row2, epsilon)
            && self.delta.abs_diff_eq(&other.delta, epsilon)
    }
}

impl RelativeEq for Mat2x3 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.row1.relative_eq(&other.row1, epsilon, max_relative)
            && self.row2.relative_eq(&other.row2, epsilon, max_relative)
            && self.delta.relative_eq(&other.delta, epsilon, max_relative)
    }
}
