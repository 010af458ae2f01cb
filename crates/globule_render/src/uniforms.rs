//! CPU mirror of the fragment shader's uniform block

use crate::config::RenderConfig;
use globule_core::{PositionBuffer, MAX_METABALLS};

/// Layout matches `Metaballs` in `shaders/metaball.wgsl`.
///
/// Uniform arrays need a 16-byte stride, so each ball takes a whole vec4 with
/// the position in `xy`. Entries at or past `count` hold whatever an earlier
/// frame left there; the shader's loop bound never reaches them.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MetaballUniforms {
    pub balls: [[f32; 4]; MAX_METABALLS],
    pub inner_color: [f32; 4],
    pub glow_color: [f32; 4],
    pub background_color: [f32; 4],
    pub count: u32,
    pub radius_squared: f32,
    pub inner_threshold: f32,
    pub glow_threshold: f32,
}

impl MetaballUniforms {
    pub fn new(config: &RenderConfig, radius_squared: f32) -> Self {
        let rgba = |[r, g, b]: [f32; 3]| [r, g, b, 1.0];
        Self {
            balls: [[0.0; 4]; MAX_METABALLS],
            inner_color: rgba(config.inner_color),
            glow_color: rgba(config.glow_color),
            background_color: rgba(config.background_color),
            count: 0,
            radius_squared,
            inner_threshold: config.inner_threshold,
            glow_threshold: config.glow_threshold,
        }
    }

    /// Copy the valid region of `positions` and set the loop bound to match.
    pub fn load_positions(&mut self, positions: &PositionBuffer) {
        for (slot, position) in self.balls.iter_mut().zip(positions.iter()) {
            slot[0] = position.x;
            slot[1] = position.y;
        }
        self.count = positions.len() as u32;
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use globule_core::glam::Vec2;

    #[test]
    fn layout_matches_wgsl_block() {
        // 100 vec4 + 3 vec4 + 4 scalars, already a multiple of 16.
        assert_eq!(std::mem::size_of::<MetaballUniforms>(), 1664);
        assert_eq!(std::mem::size_of::<MetaballUniforms>() % 16, 0);
    }

    #[test]
    fn load_copies_only_valid_entries() {
        let mut uniforms = MetaballUniforms::new(&RenderConfig::default(), 625.0);
        uniforms.balls[2] = [9.0, 9.0, 0.0, 0.0];

        let mut positions = PositionBuffer::new();
        positions.write(0, Vec2::new(1.0, 2.0));
        positions.write(1, Vec2::new(3.0, 4.0));
        positions.set_len(2);
        uniforms.load_positions(&positions);

        assert_eq!(uniforms.count, 2);
        assert_eq!(uniforms.balls[0][..2], [1.0, 2.0]);
        assert_eq!(uniforms.balls[1][..2], [3.0, 4.0]);
        // Stale, uploaded but never read.
        assert_eq!(uniforms.balls[2][..2], [9.0, 9.0]);
    }

    #[test]
    fn palette_is_opaque() {
        let uniforms = MetaballUniforms::new(&RenderConfig::default(), 625.0);
        assert_eq!(uniforms.inner_color, [0.1, 0.8, 0.9, 1.0]);
        assert_eq!(uniforms.background_color[3], 1.0);
        assert_eq!(uniforms.radius_squared, 625.0);
    }
}
