//! Shooting stars: short line streaks that wait out a random delay, streak
//! across the sky for a fixed lifetime, then go dark and wait again.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;

/// Seconds a streak stays visible.
pub const ACTIVE_LIFETIME: f32 = 1.5;
/// The head starts following the tail after this many seconds.
pub const HEAD_START_DELAY: f32 = 0.1;
/// Head speed relative to the tail.
pub const HEAD_SPEED_FACTOR: f32 = 0.9;
/// Peak of the opacity envelope.
pub const PEAK_OPACITY: f32 = 0.9;
/// Range of the delay before the first activation.
pub const INITIAL_DELAY: std::ops::Range<f32> = 0.0..5.0;
/// Range of the delay after each streak finishes.
pub const RESPAWN_DELAY: std::ops::Range<f32> = 2.0..7.0;

/// Sine envelope over the active lifetime: zero at both ends, peaking at
/// [`PEAK_OPACITY`] halfway through. Zero outside `(0, ACTIVE_LIFETIME)`.
pub fn opacity_at(lifetime: f32) -> f32 {
    if lifetime <= 0.0 || lifetime >= ACTIVE_LIFETIME {
        return 0.0;
    }
    (lifetime * PI / ACTIVE_LIFETIME).sin() * PEAK_OPACITY
}

/// What happened to a shooting star during one update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    None,
    Activated,
    Deactivated,
}

#[derive(Clone, Debug)]
pub struct ShootingStar {
    head: Vec3,
    tail: Vec3,
    /// Fixed for the lifetime of the instance.
    velocity: Vec3,
    lifetime: f32,
    delay: f32,
    active: bool,
    opacity: f32,
}

impl ShootingStar {
    /// Create an inactive shooting star with a random velocity and first delay.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let origin = Vec3::new(
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
        );
        // y in (-40, -10]: always falling.
        let velocity = Vec3::new(
            rng.random_range(-15.0..15.0),
            -rng.random::<f32>() * 30.0 - 10.0,
            rng.random_range(-15.0..15.0),
        );

        Self {
            head: origin,
            tail: origin,
            velocity,
            lifetime: 0.0,
            delay: rng.random_range(INITIAL_DELAY),
            active: false,
            opacity: 0.0,
        }
    }

    /// Advance by `delta` seconds.
    pub fn update<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) -> Transition {
        if !self.active {
            self.delay -= delta;
            if self.delay <= 0.0 {
                self.activate(rng);
                return Transition::Activated;
            }
            return Transition::None;
        }

        self.lifetime += delta;
        if self.lifetime < ACTIVE_LIFETIME {
            self.tail += self.velocity * delta;
            if self.lifetime > HEAD_START_DELAY {
                self.head += self.velocity * delta * HEAD_SPEED_FACTOR;
            }
            self.opacity = opacity_at(self.lifetime);
            Transition::None
        } else {
            self.active = false;
            self.delay = rng.random_range(RESPAWN_DELAY);
            self.opacity = 0.0;
            Transition::Deactivated
        }
    }

    fn activate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let start = Vec3::new(
            rng.random_range(-50.0..50.0),
            rng.random_range(20.0..70.0),
            rng.random_range(-50.0..50.0),
        );
        self.active = true;
        self.lifetime = 0.0;
        self.opacity = 0.0;
        self.head = start;
        self.tail = start;
    }

    pub fn head(&self) -> Vec3 {
        self.head
    }

    pub fn tail(&self) -> Vec3 {
        self.tail
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Seconds left before activation; meaningless while active.
    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Segment endpoints in upload order.
    pub fn segment(&self) -> [Vec3; 2] {
        [self.head, self.tail]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Step until the star activates, returning the number of steps taken.
    fn run_until_active(star: &mut ShootingStar, rng: &mut ChaCha8Rng, dt: f32) -> usize {
        for step in 0..10_000 {
            if star.update(dt, rng) == Transition::Activated {
                return step;
            }
        }
        panic!("shooting star never activated");
    }

    #[test]
    fn test_opacity_envelope() {
        assert_eq!(opacity_at(0.0), 0.0);
        assert_eq!(opacity_at(1.5), 0.0);
        assert_eq!(opacity_at(2.0), 0.0);
        assert_eq!(opacity_at(-0.1), 0.0);
        assert!((opacity_at(0.75) - 0.9).abs() < 1e-6);
        assert!(opacity_at(0.375) > 0.0 && opacity_at(0.375) < 0.9);
    }

    #[test]
    fn test_spawn_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for i in 0..100 {
            let star = ShootingStar::spawn(&mut rng);
            assert!(!star.is_active(), "Shooting star {i} spawned active");
            assert_eq!(star.opacity(), 0.0);
            assert!(INITIAL_DELAY.contains(&star.delay()));
            assert_eq!(star.head(), star.tail());
            let v = star.velocity();
            assert!(v.y > -40.0 && v.y <= -10.0, "Shooting star {i} vy = {}", v.y);
            assert!(v.x >= -15.0 && v.x < 15.0);
            assert!(v.z >= -15.0 && v.z < 15.0);
        }
    }

    #[test]
    fn test_activation_collapses_segment_high_in_sky() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut star = ShootingStar::spawn(&mut rng);
        run_until_active(&mut star, &mut rng, 1.0 / 60.0);
        assert!(star.is_active());
        assert_eq!(star.lifetime(), 0.0);
        assert_eq!(star.opacity(), 0.0);
        assert_eq!(star.head(), star.tail());
        let p = star.head();
        assert!((20.0..70.0).contains(&p.y), "start y = {}", p.y);
        assert!((-50.0..50.0).contains(&p.x));
        assert!((-50.0..50.0).contains(&p.z));
    }

    #[test]
    fn test_head_waits_then_trails_tail() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut star = ShootingStar::spawn(&mut rng);
        run_until_active(&mut star, &mut rng, 0.05);
        let start = star.head();

        star.update(0.05, &mut rng);
        star.update(0.05, &mut rng);
        // lifetime 0.1 is not past the head delay yet.
        assert_eq!(star.head(), start);
        assert!((star.tail() - (start + star.velocity() * 0.1)).length() < 1e-4);

        star.update(0.05, &mut rng);
        let head_travel = (star.head() - start).length();
        let tail_travel = (star.tail() - start).length();
        assert!(head_travel > 0.0);
        assert!(head_travel < tail_travel);
    }

    #[test]
    fn test_velocity_never_changes() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut star = ShootingStar::spawn(&mut rng);
        let velocity = star.velocity();
        for _ in 0..2000 {
            star.update(1.0 / 30.0, &mut rng);
        }
        assert_eq!(star.velocity(), velocity);
    }

    #[test]
    fn test_deactivation_sets_respawn_delay() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for i in 0..50 {
            let mut star = ShootingStar::spawn(&mut rng);
            run_until_active(&mut star, &mut rng, 0.1);
            let mut transition = Transition::None;
            while transition != Transition::Deactivated {
                transition = star.update(0.1, &mut rng);
            }
            assert!(!star.is_active());
            assert_eq!(star.opacity(), 0.0);
            assert!(
                (2.0..7.0).contains(&star.delay()),
                "Shooting star {i} respawn delay {} outside [2, 7)",
                star.delay()
            );
        }
    }

    #[test]
    fn test_opacity_tracks_envelope_while_active() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut star = ShootingStar::spawn(&mut rng);
        run_until_active(&mut star, &mut rng, 0.25);
        for _ in 0..5 {
            star.update(0.25, &mut rng);
            assert!(star.is_active());
            assert!((star.opacity() - opacity_at(star.lifetime())).abs() < 1e-6);
        }
        // lifetime reaches 1.5 on the sixth step.
        assert_eq!(star.update(0.25, &mut rng), Transition::Deactivated);
    }

    #[test]
    fn test_instances_are_timed_independently() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let a = ShootingStar::spawn(&mut rng);
        let b = ShootingStar::spawn(&mut rng);
        assert_ne!(a.delay(), b.delay());
    }
}
