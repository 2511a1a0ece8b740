//! Point-cloud placement for the star and particle layers.
//!
//! Points are sampled uniformly inside an axis-aligned box. Anything landing
//! inside the cloud's exclusion rectangle (the band behind page content) is
//! shoved sideways so the center of the view stays clear.

use glam::Vec3;
use rand::Rng;

/// Axis-aligned rectangle in the XY plane with an outward push.
///
/// Bounds are open: a point on an edge is outside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExclusionZone {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    /// Distance added away from x = 0 for points inside the zone.
    pub push: f32,
}

impl ExclusionZone {
    /// Strict containment test on x and y.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x > self.x_min && x < self.x_max && y > self.y_min && y < self.y_max
    }

    /// Move `point` out of the zone horizontally if it lies inside.
    pub fn apply(&self, mut point: Vec3) -> Vec3 {
        if self.contains(point.x, point.y) {
            point.x = if point.x < 0.0 {
                point.x - self.push
            } else {
                point.x + self.push
            };
        }
        point
    }
}

/// Sprite appearance for a point cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMaterial {
    pub color: [f32; 3],
    /// Sprite diameter in logical pixels, not attenuated by distance.
    pub size: f32,
    pub opacity: f32,
}

/// How many points to place and where.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointCloudDescriptor {
    pub name: &'static str,
    pub count: usize,
    /// Points are sampled in `[-half_extents, half_extents)` per axis.
    pub half_extents: Vec3,
    pub exclusion: ExclusionZone,
    pub material: PointMaterial,
}

/// The main star layer.
pub const STARS: PointCloudDescriptor = PointCloudDescriptor {
    name: "stars",
    count: 200,
    half_extents: Vec3::new(50.0, 50.0, 30.0),
    exclusion: ExclusionZone {
        x_min: -40.0,
        x_max: 40.0,
        y_min: -10.0,
        y_max: 50.0,
        push: 40.0,
    },
    material: PointMaterial {
        color: [1.0, 1.0, 1.0],
        size: 6.0,
        opacity: 1.0,
    },
};

/// The smaller, faster-rotating particle layer.
pub const PARTICLES: PointCloudDescriptor = PointCloudDescriptor {
    name: "particles",
    count: 60,
    half_extents: Vec3::new(40.0, 40.0, 25.0),
    exclusion: ExclusionZone {
        x_min: -35.0,
        x_max: 35.0,
        y_min: -8.0,
        y_max: 45.0,
        push: 35.0,
    },
    material: PointMaterial {
        color: [1.0, 1.0, 1.0],
        size: 4.0,
        opacity: 0.7,
    },
};

impl PointCloudDescriptor {
    /// Sample `count` points and apply the exclusion push.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Vec3> {
        (0..self.count)
            .map(|_| {
                let p = Vec3::new(
                    centered(rng, self.half_extents.x),
                    centered(rng, self.half_extents.y),
                    centered(rng, self.half_extents.z),
                );
                self.exclusion.apply(p)
            })
            .collect()
    }
}

/// `(r - 0.5) * 2 * half` with `r` in `[0, 1)`.
fn centered<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0 * half
}
