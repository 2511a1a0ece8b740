//! wgpu rendering for the starfield: GPU context, surface tracking, camera,
//! additive point-sprite and line pipelines, and frame encoding.

pub mod buffer;
pub mod camera;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod shader;
pub mod surface;
pub mod texture;

pub use buffer::{BufferAllocator, LineVertex, PointVertex};
pub use camera::{Camera, DEFAULT_DISTANCE, DEFAULT_FOV_Y_DEGREES};
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, SurfaceOptions, init_render_context_blocking,
};
pub use pass::{FrameEncoder, RenderPassBuilder, TRANSPARENT};
pub use pipeline::{
    CameraUniform, DrawUniform, LINE_SHADER_SOURCE, LinePipeline, POINT_SPRITE_SHADER_SOURCE,
    PointSpritePipeline, StarfieldLayouts, additive_blend, draw_lines, draw_points,
};
pub use shader::compile_wgsl;
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
pub use texture::{SpriteTexture, TextureError};

/// Headless device helpers for GPU tests in this and downstream crates.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    /// Create a test GPU device and queue. Returns `None` if no GPU is available.
    pub fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .ok()?;

            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                    memory_hints: wgpu::MemoryHints::default(),
                    experimental_features: Default::default(),
                    trace: wgpu::Trace::Off,
                })
                .await
                .ok()
        })
    }
}
