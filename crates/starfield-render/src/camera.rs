//! Perspective camera that orbits the scene origin.

use crate::pipeline::CameraUniform;
use glam::{Mat4, Vec3};

/// Vertical field of view used by the background camera, in degrees.
pub const DEFAULT_FOV_Y_DEGREES: f32 = 75.0;
/// Distance from the origin along +Z at startup.
pub const DEFAULT_DISTANCE: f32 = 30.0;

/// A perspective camera that always looks at a target point.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Point the camera is oriented toward.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Build a camera at `(0, 0, DEFAULT_DISTANCE)` looking at the origin.
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            aspect_ratio: sanitize_aspect(aspect_ratio),
            ..Self::default()
        }
    }

    /// Orient the camera toward `target`.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Right-handed view matrix with +Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Standard (non-reversed) depth: nothing in the scene is depth tested.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio from surface dimensions.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = sanitize_aspect(width / height);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Convert the camera to a uniform suitable for GPU upload.
    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, DEFAULT_DISTANCE),
            target: Vec3::ZERO,
            fov_y: DEFAULT_FOV_Y_DEGREES.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// `perspective_rh` asserts on a non-positive aspect.
fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_default_camera_parameters() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 30.0));
        assert!((camera.fov_y - 75f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
    }

    #[test]
    fn test_default_camera_looks_down_neg_z() {
        let origin = Camera::default().view_matrix().transform_point3(Vec3::ZERO);
        assert!(origin.x.abs() < 1e-5);
        assert!(origin.y.abs() < 1e-5);
        assert!((origin.z + 30.0).abs() < 1e-5);
    }

    #[test]
    fn test_set_aspect_ratio_is_exact() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert_eq!(camera.aspect_ratio(), 1920.0 / 1080.0);
    }

    #[test]
    fn test_degenerate_aspect_falls_back() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(800.0, 0.0);
        assert_eq!(camera.aspect_ratio(), 1.0);
        assert_eq!(Camera::new(f32::NAN).aspect_ratio(), 1.0);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(3.0, -2.0, 30.0);
        camera.look_at(Vec3::ZERO);
        let clip = camera.view_projection_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }

    #[test]
    fn test_depth_range_is_zero_to_one() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();
        let near = proj * Vec4::new(0.0, 0.0, -camera.near, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -camera.far, 1.0);
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_uniform_matches_view_projection() {
        let camera = Camera::new(1.5);
        let uniform = camera.to_uniform();
        assert_eq!(
            uniform.view_proj,
            camera.view_projection_matrix().to_cols_array_2d()
        );
    }
}
