//! Cursor tracking in window pixels and normalized device coordinates.
//!
//! [`MouseState`] records the last cursor position reported by winit and
//! converts it into the `[-1, 1]` range used to steer the camera. Until the
//! first `CursorMoved` event arrives the pointer reads as the origin.

use glam::Vec2;
use winit::dpi::PhysicalPosition;

/// Last known cursor position.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// Cursor position in physical pixels, origin top-left.
    position: Vec2,
    has_moved: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event.
    pub fn on_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        if !self.has_moved {
            tracing::trace!(x = position.x, y = position.y, "first cursor movement");
        }
        self.position = Vec2::new(position.x as f32, position.y as f32);
        self.has_moved = true;
    }

    /// Cursor in normalized coordinates for a `width`×`height` surface.
    ///
    /// Returns `Vec2::ZERO` before the first movement.
    #[must_use]
    pub fn normalized(&self, width: u32, height: u32) -> Vec2 {
        if !self.has_moved {
            return Vec2::ZERO;
        }
        normalize_cursor(self.position, width, height)
    }
}

/// Map window pixels to `[-1, 1]` with +Y up:
/// `x = cx / w * 2 - 1`, `y = -(cy / h) * 2 + 1`.
#[must_use]
pub fn normalize_cursor(cursor: Vec2, width: u32, height: u32) -> Vec2 {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    Vec2::new(cursor.x / w * 2.0 - 1.0, -(cursor.y / h) * 2.0 + 1.0)
}
