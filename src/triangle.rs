//! Vertex layouts and triangles, plus their textual form.
//!
//! The three vertex layouts are `#[repr(C)]` because the renderer points GL
//! vertex attributes straight at them:
//!
//! | layout | fields                    | stride |
//! |--------|---------------------------|--------|
//! | [`V0`] | pos                       | 8      |
//! | [`V1`] | pos, color                | 12     |
//! | [`V2`] | pos, tex_coord, color     | 20     |
//!
//! Text form is whitespace-separated numbers in field order; a color is four
//! normalized floats `r g b a`. A triangle is three vertices in sequence.

use std::str::{FromStr, SplitWhitespace};

use thiserror::Error;

use crate::color::{Color, ColorError};
use crate::math::vec2::Vec2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected end of input while reading {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("invalid number {token:?} for {field}")]
    InvalidNumber { field: &'static str, token: String },
    #[error("invalid vertex color: {0}")]
    Color(#[from] ColorError),
    #[error("unexpected trailing input starting at {0:?}")]
    TrailingInput(String),
}

/// Vertex with position only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct V0 {
    pub pos: Vec2,
}

/// Vertex with position and color.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct V1 {
    pub pos: Vec2,
    pub color: Color,
}

/// Vertex with position, texture coordinate and color.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct V2 {
    pub pos: Vec2,
    pub tex_coord: Vec2,
    pub color: Color,
}

/// Triangle of position-only vertices.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tri0 {
    pub vertices: [V0; 3],
}

/// Triangle of position + color vertices.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tri1 {
    pub vertices: [V1; 3],
}

/// Triangle of position + texture coordinate + color vertices.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tri2 {
    pub vertices: [V2; 3],
}

impl V0 {
    pub const fn new(pos: Vec2) -> Self {
        Self { pos }
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(self.pos.lerp(other.pos, t))
    }
}

impl V1 {
    pub const fn new(pos: Vec2, color: Color) -> Self {
        Self { pos, color }
    }
}

impl V2 {
    pub const fn new(pos: Vec2, tex_coord: Vec2, color: Color) -> Self {
        Self {
            pos,
            tex_coord,
            color,
        }
    }
}

impl Tri0 {
    pub const fn new(vertices: [V0; 3]) -> Self {
        Self { vertices }
    }

    /// Blends every vertex position towards `other` by `t`.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let [a, b, c] = self.vertices;
        let [d, e, f] = other.vertices;
        Self::new([a.lerp(d, t), b.lerp(e, t), c.lerp(f, t)])
    }
}

impl Tri1 {
    pub const fn new(vertices: [V1; 3]) -> Self {
        Self { vertices }
    }
}

impl Tri2 {
    pub const fn new(vertices: [V2; 3]) -> Self {
        Self { vertices }
    }
}

/// Whitespace-separated token stream over scene text.
pub struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    /// Returns the next token parsed as `f32`.
    pub fn next_f32(&mut self, field: &'static str) -> Result<f32, ParseError> {
        let token = self
            .inner
            .next()
            .ok_or(ParseError::UnexpectedEnd { expected: field })?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            field,
            token: token.to_string(),
        })
    }

    /// Fails if any token is left.
    pub fn finish(mut self) -> Result<(), ParseError> {
        match self.inner.next() {
            Some(token) => Err(ParseError::TrailingInput(token.to_string())),
            None => Ok(()),
        }
    }

    fn is_empty(&self) -> bool {
        self.inner.clone().next().is_none()
    }
}

/// Types readable from a [`Tokens`] stream in their fixed field order.
pub trait ReadTokens: Sized {
    fn read(tokens: &mut Tokens<'_>) -> Result<Self, ParseError>;
}

impl ReadTokens for Vec2 {
    fn read(tokens: &mut Tokens<'_>) -> Result<Self, ParseError> {
        Ok(Vec2::new(tokens.next_f32("x")?, tokens.next_f32("y")?))
    }
}

impl ReadTokens for Color {
    fn read(tokens: &mut Tokens<'_>) -> Result<Self, ParseError> {
        let r = tokens.next_f32("r")?;
        let g = tokens.next_f32("g")?;
        let b = tokens.next_f32("b")?;
        let a = tokens.next_f32("a")?;
        Ok(Color::new(r, g, b, a)?)
    }
}

impl ReadTokens for V0 {
    fn read(tokens: &mut Tokens<'_>) -> Result<Self, ParseError> {
        Ok(V0::new(Vec2::read(tokens)?))
    }
}

impl ReadTokens for V1 {
    fn read(tokens: &mut Tokens<'_>) -> Result<Self, ParseError> {
        let pos = Vec2::read(tokens)?;
        let color = Color::read(tokens)?;
        Ok(V1::new(pos, color))
    }
}

impl ReadTokens for V2 {
    fn read(tokens: &mut Tokens<'_>) -> Result<Self, ParseError> {
        let pos = Vec2::read(tokens)?;
        let tex_coord = Vec2::read(tokens)?;
        let color = Color::read(tokens)?;
        Ok(V2::new(pos, tex_coord, color))
    }
}

fn read_three<T: ReadTokens>(tokens: &mut Tokens<'_>) -> Result<[T; 3], ParseError> {
    Ok([T::read(tokens)?, T::read(tokens)?, T::read(tokens)?])
}

impl ReadTokens for Tri0 {
    fn read(tokens: &mut Tokens<'_>) -> Result<Self, ParseError> {
        read_three(tokens).map(Tri0::new)
    }
}

impl ReadTokens for Tri1 {
    fn read(tokens: &mut Tokens<'_>) -> Result<Self, ParseError> {
        read_three(tokens).map(Tri1::new)
    }
}

impl ReadTokens for Tri2 {
    fn read(tokens: &mut Tokens<'_>) -> Result<Self, ParseError> {
        read_three(tokens).map(Tri2::new)
    }
}

macro_rules! impl_from_str {
    ($($ty:ty),*) => {
        $(
            impl FromStr for $ty {
                type Err = ParseError;

                /// Parses exactly one value; trailing tokens are an error.
                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    let mut tokens = Tokens::new(s);
                    let value = <$ty>::read(&mut tokens)?;
                    tokens.finish()?;
                    Ok(value)
                }
            }
        )*
    };
}

impl_from_str!(V0, V1, V2, Tri0, Tri1, Tri2);

/// Reads triangles (or vertices) until the input is exhausted.
///
/// A record cut short at the end of input is a [`ParseError::UnexpectedEnd`].
pub fn parse_triangles<T: ReadTokens>(text: &str) -> Result<Vec<T>, ParseError> {
    let mut tokens = Tokens::new(text);
    let mut out = Vec::new();
    while !tokens.is_empty() {
        out.push(T::read(&mut tokens)?);
    }
    Ok(out)
}
