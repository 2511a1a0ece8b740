//! Window surface dimensions tracked independently of the GPU surface.
//!
//! The background window can report zero-size frames (minimized, or Wayland
//! before the compositor assigns a size). The wrapper clamps those to 1×1 and
//! only reports a change when the physical size actually moves.

/// Minimum surface dimension.
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Emitted when the surface must be reconfigured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceResizeEvent {
    /// New physical pixel dimensions, already clamped.
    pub physical: PhysicalSize,
    /// Physical pixels per logical pixel.
    pub scale_factor: f64,
}

/// Tracks the window's physical size and scale factor.
#[derive(Debug, Clone)]
pub struct SurfaceWrapper {
    physical: PhysicalSize,
    scale_factor: f64,
}

impl SurfaceWrapper {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical: clamp_size(physical_width, physical_height),
            scale_factor,
        }
    }

    /// Record a window resize. Returns `None` when the clamped size is unchanged.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let size = clamp_size(physical_width, physical_height);
        if size == self.physical {
            return None;
        }

        self.physical = size;

        Some(SurfaceResizeEvent {
            physical: size,
            scale_factor: self.scale_factor,
        })
    }

    /// Record a scale factor change together with the new physical size.
    ///
    /// Always produces an event when the scale factor moved, even if the
    /// physical size happens to be identical, so point sprite sizes refresh.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let scale_changed = (new_scale_factor - self.scale_factor).abs() > f64::EPSILON;
        self.scale_factor = new_scale_factor;
        match self.handle_resize(new_physical_width, new_physical_height) {
            Some(event) => Some(event),
            None if scale_changed => Some(SurfaceResizeEvent {
                physical: self.physical,
                scale_factor: new_scale_factor,
            }),
            None => None,
        }
    }

    pub fn physical_size(&self) -> PhysicalSize {
        self.physical
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

fn clamp_size(width: u32, height: u32) -> PhysicalSize {
    PhysicalSize {
        width: width.max(MIN_SURFACE_DIMENSION),
        height: height.max(MIN_SURFACE_DIMENSION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_window_is_clamped() {
        let wrapper = SurfaceWrapper::new(0, 0, 1.0);
        assert_eq!(
            wrapper.physical_size(),
            PhysicalSize {
                width: 1,
                height: 1
            }
        );
    }

    #[test]
    fn test_first_real_resize_reports_size() {
        let mut wrapper = SurfaceWrapper::new(0, 0, 1.0);
        let event = wrapper
            .handle_resize(1920, 1080)
            .expect("size changed, event expected");
        assert_eq!(event.physical.width, 1920);
        assert_eq!(event.physical.height, 1080);
        assert_eq!(wrapper.physical_size(), event.physical);
    }

    #[test]
    fn test_same_size_produces_no_event() {
        let mut wrapper = SurfaceWrapper::new(1280, 720, 1.0);
        assert!(wrapper.handle_resize(1280, 720).is_none());
    }

    #[test]
    fn test_resize_event_aspect_ratio() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        let event = wrapper.handle_resize(1920, 1080).unwrap();
        assert_eq!(event.physical.aspect_ratio(), 1920.0 / 1080.0);
    }

    #[test]
    fn test_minimize_clamps_to_one_by_one() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        let event = wrapper.handle_resize(0, 0).unwrap();
        assert_eq!(event.physical.width, 1);
        assert_eq!(event.physical.height, 1);
    }

    #[test]
    fn test_scale_factor_change_with_new_size() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0);
        let event = wrapper.handle_scale_factor_changed(2.0, 3840, 2160).unwrap();
        assert_eq!(event.physical.width, 3840);
        assert_eq!(event.scale_factor, 2.0);
        assert_eq!(wrapper.scale_factor(), 2.0);
    }

    #[test]
    fn test_scale_factor_change_same_size_still_reports() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0);
        let event = wrapper.handle_scale_factor_changed(1.5, 1920, 1080);
        assert!(event.is_some());
        assert!(wrapper.handle_scale_factor_changed(1.5, 1920, 1080).is_none());
    }
}
