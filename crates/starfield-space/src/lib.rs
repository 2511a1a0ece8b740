//! Starfield scene: point-cloud generation, the round sprite, shooting star
//! animation, per-frame scene updates, and the wgpu renderer that draws them.

pub mod renderer;
pub mod scene;
pub mod shooting_star;
pub mod sprite;
pub mod starfield;

pub use renderer::{FrameViewport, StarfieldRenderer};
pub use scene::{
    CloudRotation, PARALLAX_EASING, PARALLAX_RANGE, SHOOTING_STAR_COUNT, StarfieldScene,
    parallax_step,
};
pub use shooting_star::{ACTIVE_LIFETIME, ShootingStar, Transition, opacity_at};
pub use sprite::{SPRITE_SIZE, gradient_alpha, radial_gradient_sprite};
pub use starfield::{ExclusionZone, PARTICLES, PointCloudDescriptor, PointMaterial, STARS};
