//! Starfield background application.
//!
//! Provides the background window, event handling, frame timing, and GPU
//! adapter polling.

pub mod game_loop;
pub mod platform;
pub mod startup;
pub mod window;

pub use game_loop::{FrameClock, FrameStats, FrameTime, MAX_FRAME_DELTA};
pub use platform::{APP_NAME, PlatformDirs, PlatformError};
pub use startup::{InitRetry, RetryDecision};
pub use window::{AppState, run_with_config, window_attributes_from_config};
