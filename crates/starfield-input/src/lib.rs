//! Pointer input for the starfield parallax.

pub mod mouse;

pub use mouse::{MouseState, normalize_cursor};
