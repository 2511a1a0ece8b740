//! Render pass configuration and per-frame command encoding.
//!
//! [`RenderPassBuilder`] describes the single color pass the background
//! uses. [`FrameEncoder`] owns the acquired surface texture for one frame and
//! presents it on [`FrameEncoder::submit`].

/// Fully transparent clear so the desktop shows through the background window.
pub const TRANSPARENT: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

/// Builder for configuring render pass descriptors with a fluent API.
#[derive(Debug, Clone)]
pub struct RenderPassBuilder {
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// Create a builder that clears to [`TRANSPARENT`].
    pub fn new() -> Self {
        Self { label: None }
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Begin a color-only render pass on `color_view`.
    pub fn begin<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Command encoding for one presented frame.
pub struct FrameEncoder<'q> {
    encoder: wgpu::CommandEncoder,
    queue: &'q wgpu::Queue,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl<'q> FrameEncoder<'q> {
    pub fn new(
        device: &wgpu::Device,
        queue: &'q wgpu::Queue,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder,
            queue,
            surface_texture,
            surface_view,
        }
    }

    /// Begin a render pass targeting the surface texture.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &RenderPassBuilder,
    ) -> wgpu::RenderPass<'a> {
        builder.begin(&mut self.encoder, &self.surface_view)
    }

    /// Submit recorded commands and present the surface texture.
    pub fn submit(self) {
        self.queue.submit([self.encoder.finish()]);
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device;

    #[test]
    fn test_clear_is_fully_transparent() {
        assert_eq!(TRANSPARENT.a, 0.0);
        assert_eq!((TRANSPARENT.r, TRANSPARENT.g, TRANSPARENT.b), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_builder_label() {
        assert_eq!(RenderPassBuilder::default().label, None);
        let builder = RenderPassBuilder::new().label("starfield-pass");
        assert_eq!(builder.label, Some("starfield-pass"));
    }

    #[test]
    fn test_pass_records_on_offscreen_target() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen"),
            size: wgpu::Extent3d {
                width: 4,
                height: 4,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("test-encoder"),
        });
        {
            let _pass = RenderPassBuilder::new().begin(&mut encoder, &view);
        }
        queue.submit([encoder.finish()]);
    }
}
