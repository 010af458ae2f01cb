//! Flattened position buffer shared with the fragment shader
//!
//! Fixed capacity, two floats per ball. Only the first `len` entries are
//! meaningful; everything past that is stale data from earlier frames.

use glam::Vec2;

/// Size of the shader's uniform position array. Hard upper bound on the
/// number of balls any simulation can hold.
pub const MAX_METABALLS: usize = 100;

#[derive(Debug, Clone)]
pub struct PositionBuffer {
    data: [f32; 2 * MAX_METABALLS],
    len: usize,
}

impl PositionBuffer {
    pub fn new() -> Self {
        Self {
            data: [0.0; 2 * MAX_METABALLS],
            len: 0,
        }
    }

    /// Store the position for ball `index`. Writes past the capacity are dropped.
    pub fn write(&mut self, index: usize, position: Vec2) {
        debug_assert!(index < MAX_METABALLS, "position index {index} out of range");
        if let Some(slot) = self.data.get_mut(2 * index..2 * index + 2) {
            slot[0] = position.x;
            slot[1] = position.y;
        }
    }

    /// Mark the first `len` entries as valid. Call after every entry below
    /// `len` has been written for this frame.
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(MAX_METABALLS);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        if index >= self.len {
            return None;
        }
        Some(Vec2::new(self.data[2 * index], self.data[2 * index + 1]))
    }

    /// The valid region: `2 * len` floats.
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..2 * self.len]
    }

    /// Iterate the valid positions.
    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.as_slice()
            .chunks_exact(2)
            .map(|pair| Vec2::new(pair[0], pair[1]))
    }
}

impl Default for PositionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_past_len_are_hidden() {
        let mut buffer = PositionBuffer::new();
        buffer.write(0, Vec2::new(1.0, 2.0));
        buffer.write(1, Vec2::new(3.0, 4.0));
        buffer.set_len(1);

        assert_eq!(buffer.as_slice(), &[1.0, 2.0]);
        assert_eq!(buffer.get(0), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(buffer.get(1), None);
    }

    #[test]
    fn clear_keeps_data_but_drops_len() {
        let mut buffer = PositionBuffer::new();
        buffer.write(0, Vec2::new(5.0, 6.0));
        buffer.set_len(1);
        buffer.clear();

        assert!(buffer.is_empty());
        assert!(buffer.as_slice().is_empty());
        assert_eq!(buffer.iter().count(), 0);
    }

    #[test]
    fn len_is_capped_at_capacity() {
        let mut buffer = PositionBuffer::new();
        buffer.set_len(MAX_METABALLS + 10);
        assert_eq!(buffer.len(), MAX_METABALLS);
        assert_eq!(buffer.as_slice().len(), 2 * MAX_METABALLS);
    }
}
