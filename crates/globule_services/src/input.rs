//! Pointer input

/// Tracks the cursor so a button press can be turned into a surface-local
/// point. Coordinates are physical pixels with a top-left origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    position: Option<(f32, f32)>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moved(&mut self, x: f64, y: f64) {
        self.position = Some((x as f32, y as f32));
    }

    /// Cursor left the surface.
    pub fn left(&mut self) {
        self.position = None;
    }

    /// Where a pointer-down lands, if the cursor is over the surface.
    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }
}
