//! Scene state and the per-frame animation step.

use glam::{Mat4, Vec2, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starfield_render::Camera;

use crate::shooting_star::{ShootingStar, Transition};
use crate::starfield::{PARTICLES, STARS};

/// Number of shooting star instances.
pub const SHOOTING_STAR_COUNT: usize = 2;
/// Camera offset at full mouse deflection.
pub const PARALLAX_RANGE: f32 = 5.0;
/// Fraction of the remaining distance covered each frame.
pub const PARALLAX_EASING: f32 = 0.05;

/// Rotation of a point cloud as X then Y Euler angles, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CloudRotation {
    pub x: f32,
    pub y: f32,
}

impl CloudRotation {
    /// Model matrix for XYZ Euler order: `Rx * Ry`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.x) * Mat4::from_rotation_y(self.y)
    }

    pub fn stars_at(elapsed: f32) -> Self {
        Self {
            x: elapsed * 0.01,
            y: elapsed * 0.02,
        }
    }

    pub fn particles_at(elapsed: f32) -> Self {
        Self {
            x: (elapsed * 0.3).sin() * 0.3,
            y: elapsed * 0.05,
        }
    }
}

/// Move `current` a fixed fraction of the way toward the mouse-derived target.
pub fn parallax_step(current: Vec2, mouse: Vec2) -> Vec2 {
    let target = mouse * PARALLAX_RANGE;
    current + (target - current) * PARALLAX_EASING
}

/// Everything that animates: two point clouds and the shooting stars.
pub struct StarfieldScene {
    rng: ChaCha8Rng,
    stars: Vec<Vec3>,
    particles: Vec<Vec3>,
    shooting_stars: [ShootingStar; SHOOTING_STAR_COUNT],
    star_rotation: CloudRotation,
    particle_rotation: CloudRotation,
}

impl StarfieldScene {
    /// Build the scene; `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self::from_rng(rng)
    }

    pub fn from_rng(mut rng: ChaCha8Rng) -> Self {
        let stars = STARS.generate(&mut rng);
        let particles = PARTICLES.generate(&mut rng);
        let shooting_stars = std::array::from_fn(|_| ShootingStar::spawn(&mut rng));
        log::info!(
            "Starfield scene created: {} stars, {} particles, {} shooting stars",
            stars.len(),
            particles.len(),
            SHOOTING_STAR_COUNT
        );

        Self {
            rng,
            stars,
            particles,
            shooting_stars,
            star_rotation: CloudRotation::default(),
            particle_rotation: CloudRotation::default(),
        }
    }

    /// Advance the scene to `elapsed` seconds, `delta` after the previous frame.
    ///
    /// `mouse` is in normalized device coordinates. The camera eases toward
    /// the parallax target and is re-aimed at the origin.
    pub fn update(&mut self, elapsed: f32, delta: f32, mouse: Vec2, camera: &mut Camera) {
        self.star_rotation = CloudRotation::stars_at(elapsed);
        self.particle_rotation = CloudRotation::particles_at(elapsed);

        let xy = parallax_step(camera.position.truncate(), mouse);
        camera.position.x = xy.x;
        camera.position.y = xy.y;
        camera.look_at(Vec3::ZERO);

        for (i, star) in self.shooting_stars.iter_mut().enumerate() {
            match star.update(delta, &mut self.rng) {
                Transition::Activated => log::trace!("Shooting star {i} activated"),
                Transition::Deactivated => {
                    log::trace!("Shooting star {i} finished, next in {:.2}s", star.delay())
                }
                Transition::None => {}
            }
        }
    }

    pub fn stars(&self) -> &[Vec3] {
        &self.stars
    }

    pub fn particles(&self) -> &[Vec3] {
        &self.particles
    }

    pub fn shooting_stars(&self) -> &[ShootingStar] {
        &self.shooting_stars
    }

    pub fn star_rotation(&self) -> CloudRotation {
        self.star_rotation
    }

    pub fn particle_rotation(&self) -> CloudRotation {
        self.particle_rotation
    }
}
