//! Additive point-sprite and line pipelines.
//!
//! Bind group convention shared by both pipelines:
//! - group 0: [`CameraUniform`]
//! - group 1: [`DrawUniform`] (one per drawn object)
//! - group 2: sprite texture + sampler (point sprites only)

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use std::num::NonZeroU64;

use crate::buffer::{LineVertex, PointVertex};

/// Uniform buffer for camera view-projection matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4], // 64 bytes, mat4x4
}

/// Per-object uniform: transform, tint, and point sprite sizing.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    /// RGB tint with opacity in the alpha channel.
    pub color: [f32; 4],
    /// Surface size in physical pixels.
    pub viewport: [f32; 2],
    /// Sprite diameter in physical pixels.
    pub point_size: f32,
    pub _padding: f32,
}

impl DrawUniform {
    pub fn new(model: Mat4, color: [f32; 3], opacity: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], opacity],
            viewport: [1.0, 1.0],
            point_size: 1.0,
            _padding: 0.0,
        }
    }

    pub fn with_point_size(mut self, point_size: f32, viewport: (u32, u32)) -> Self {
        self.point_size = point_size;
        self.viewport = [viewport.0.max(1) as f32, viewport.1.max(1) as f32];
        self
    }
}

/// `src * src_alpha + dst` on color; alpha accumulates the same way.
pub fn additive_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

/// Bind group layouts used by every starfield pipeline.
pub struct StarfieldLayouts {
    pub camera: wgpu::BindGroupLayout,
    pub draw: wgpu::BindGroupLayout,
    pub sprite: wgpu::BindGroupLayout,
}

impl StarfieldLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let camera = uniform_layout(
            device,
            "camera-bind-group-layout",
            wgpu::ShaderStages::VERTEX,
            std::mem::size_of::<CameraUniform>() as u64,
        );
        let draw = uniform_layout(
            device,
            "draw-bind-group-layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            std::mem::size_of::<DrawUniform>() as u64,
        );
        let sprite = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self {
            camera,
            draw,
            sprite,
        }
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
    size: u64,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        }],
    })
}

fn additive_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        // Additive layers are order independent; no depth test.
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(additive_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// Screen-space point sprites expanded from one instance per point.
pub struct PointSpritePipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl PointSpritePipeline {
    /// Vertices emitted per sprite quad (two triangles).
    pub const VERTICES_PER_SPRITE: u32 = 6;

    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        layouts: &StarfieldLayouts,
    ) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("point-sprite-pipeline-layout"),
            bind_group_layouts: &[&layouts.camera, &layouts.draw, &layouts.sprite],
            immediate_size: 0,
        });

        let pipeline = additive_pipeline(
            device,
            "point-sprite-pipeline",
            &pipeline_layout,
            shader,
            PointVertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
            surface_format,
        );

        Self { pipeline }
    }
}

/// Single-pixel line segments.
pub struct LinePipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl LinePipeline {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        layouts: &StarfieldLayouts,
    ) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line-pipeline-layout"),
            bind_group_layouts: &[&layouts.camera, &layouts.draw],
            immediate_size: 0,
        });

        let pipeline = additive_pipeline(
            device,
            "line-pipeline",
            &pipeline_layout,
            shader,
            LineVertex::layout(),
            wgpu::PrimitiveTopology::LineList,
            surface_format,
        );

        Self { pipeline }
    }
}

/// Draw `instance_count` point sprites from an instance buffer.
pub fn draw_points(
    render_pass: &mut wgpu::RenderPass<'_>,
    pipeline: &PointSpritePipeline,
    camera_bind_group: &wgpu::BindGroup,
    draw_bind_group: &wgpu::BindGroup,
    sprite_bind_group: &wgpu::BindGroup,
    instances: &wgpu::Buffer,
    instance_count: u32,
) {
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, camera_bind_group, &[]);
    render_pass.set_bind_group(1, draw_bind_group, &[]);
    render_pass.set_bind_group(2, sprite_bind_group, &[]);
    render_pass.set_vertex_buffer(0, instances.slice(..));
    render_pass.draw(
        0..PointSpritePipeline::VERTICES_PER_SPRITE,
        0..instance_count,
    );
}

/// Draw the line segments stored in `vertices`.
pub fn draw_lines(
    render_pass: &mut wgpu::RenderPass<'_>,
    pipeline: &LinePipeline,
    camera_bind_group: &wgpu::BindGroup,
    draw_bind_group: &wgpu::BindGroup,
    vertices: &wgpu::Buffer,
    vertex_count: u32,
) {
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, camera_bind_group, &[]);
    render_pass.set_bind_group(1, draw_bind_group, &[]);
    render_pass.set_vertex_buffer(0, vertices.slice(..));
    render_pass.draw(0..vertex_count, 0..1);
}

/// Point sprites: each instance is a world-space center expanded into a
/// screen-aligned quad of `point_size` physical pixels.
pub const POINT_SPRITE_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
};

struct DrawUniform {
    model: mat4x4<f32>,
    color: vec4<f32>,
    viewport: vec2<f32>,
    point_size: f32,
    _padding: f32,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var<uniform> draw: DrawUniform;

@group(2) @binding(0)
var sprite_texture: texture_2d<f32>;
@group(2) @binding(1)
var sprite_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec3<f32>,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    var clip = camera.view_proj * draw.model * vec4<f32>(center, 1.0);
    // Half the sprite in pixels, converted to NDC and scaled by w.
    clip = vec4<f32>(
        clip.xy + corner * draw.point_size / draw.viewport * clip.w,
        clip.z,
        clip.w,
    );

    var out: VertexOutput;
    out.clip_position = clip;
    out.uv = vec2<f32>(corner.x * 0.5 + 0.5, 0.5 - corner.y * 0.5);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(sprite_texture, sprite_sampler, in.uv);
    return vec4<f32>(draw.color.rgb * texel.rgb, texel.a * draw.color.a);
}
"#;

/// Lines: world-space endpoints with a uniform tint and opacity.
pub const LINE_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
};

struct DrawUniform {
    model: mat4x4<f32>,
    color: vec4<f32>,
    viewport: vec2<f32>,
    point_size: f32,
    _padding: f32,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var<uniform> draw: DrawUniform;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return camera.view_proj * draw.model * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return draw.color;
}
"#;
