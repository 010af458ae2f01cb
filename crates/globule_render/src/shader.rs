//! Metaball shader source and its CPU reference
//!
//! `field_sum` and `FieldBand::classify` compute exactly what `fs_main` does
//! per pixel, so the thresholding can be checked without a GPU.

use glam::Vec2;

pub const METABALL_WGSL: &str = include_str!("shaders/metaball.wgsl");

/// Floor on squared distance; keeps the field finite at a ball's center.
pub const FIELD_EPSILON: f32 = 0.001;

/// Full-surface quad in clip space, drawn as a triangle strip.
pub const QUAD_VERTICES: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];

/// Summed field at `pixel` for balls sharing one squared radius.
pub fn field_sum(pixel: Vec2, balls: impl IntoIterator<Item = Vec2>, radius_squared: f32) -> f32 {
    balls
        .into_iter()
        .map(|ball| radius_squared / ball.distance_squared(pixel).max(FIELD_EPSILON))
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBand {
    Inner,
    Glow,
    Background,
}

impl FieldBand {
    pub fn classify(sum: f32, inner_threshold: f32, glow_threshold: f32) -> Self {
        if sum >= inner_threshold {
            FieldBand::Inner
        } else if sum >= glow_threshold {
            FieldBand::Glow
        } else {
            FieldBand::Background
        }
    }
}
