//! GPU side of the starfield: uploads the scene once, refreshes uniforms
//! and shooting star segments every frame, and records the draw calls.

use starfield_render::{
    BufferAllocator, Camera, DrawUniform, LINE_SHADER_SOURCE, LinePipeline, LineVertex,
    POINT_SPRITE_SHADER_SOURCE, PointSpritePipeline, PointVertex, SpriteTexture, StarfieldLayouts,
    TextureError, compile_wgsl, draw_lines, draw_points,
};

use crate::scene::{CloudRotation, StarfieldScene};
use crate::shooting_star::ShootingStar;
use crate::sprite::{SPRITE_SIZE, radial_gradient_sprite};
use crate::starfield::{PARTICLES, PointCloudDescriptor, STARS};

/// Shooting star streak color.
const STREAK_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Surface parameters that affect per-frame uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameViewport {
    /// Physical pixel size of the target surface.
    pub size: (u32, u32),
    /// Physical pixels per logical pixel.
    pub scale_factor: f32,
}

/// One point cloud on the GPU.
struct PointCloudDraw {
    desc: PointCloudDescriptor,
    instances: wgpu::Buffer,
    instance_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl PointCloudDraw {
    fn new(
        allocator: &BufferAllocator<'_>,
        layouts: &StarfieldLayouts,
        desc: PointCloudDescriptor,
        points: &[glam::Vec3],
    ) -> Self {
        let vertices: Vec<PointVertex> = points.iter().copied().map(PointVertex::from).collect();
        let instances =
            allocator.create_vertex_buffer(&format!("{}-instances", desc.name), &vertices);
        let uniform = point_uniform(&desc, CloudRotation::default(), (1, 1), 1.0);
        let (uniform_buffer, bind_group) = allocator.create_uniform_binding(
            &format!("{}-draw", desc.name),
            &layouts.draw,
            &uniform,
        );

        Self {
            desc,
            instances,
            instance_count: vertices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }
}

/// One shooting star segment on the GPU.
struct StreakDraw {
    vertices: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    visible: bool,
}

/// Draws the star and particle clouds plus the shooting star streaks.
pub struct StarfieldRenderer {
    points: PointSpritePipeline,
    lines: LinePipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    sprite: SpriteTexture,
    clouds: [PointCloudDraw; 2],
    streaks: Vec<StreakDraw>,
}

impl StarfieldRenderer {
    /// Compile shaders, build pipelines, and upload the scene's point clouds.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        scene: &StarfieldScene,
        camera: &Camera,
    ) -> Result<Self, TextureError> {
        let point_shader = compile_wgsl(device, "point-sprite", POINT_SPRITE_SHADER_SOURCE);
        let line_shader = compile_wgsl(device, "line", LINE_SHADER_SOURCE);

        let layouts = StarfieldLayouts::new(device);
        let points = PointSpritePipeline::new(device, &point_shader, surface_format, &layouts);
        let lines = LinePipeline::new(device, &line_shader, surface_format, &layouts);

        let sprite = SpriteTexture::from_rgba8(
            device,
            queue,
            &layouts.sprite,
            "star-sprite",
            &radial_gradient_sprite(),
            SPRITE_SIZE,
            SPRITE_SIZE,
        )?;

        let allocator = BufferAllocator::new(device);
        let (camera_buffer, camera_bind_group) = allocator.create_uniform_binding(
            "camera-uniform",
            &layouts.camera,
            &camera.to_uniform(),
        );

        let clouds = [
            PointCloudDraw::new(&allocator, &layouts, STARS, scene.stars()),
            PointCloudDraw::new(&allocator, &layouts, PARTICLES, scene.particles()),
        ];

        let streaks = scene
            .shooting_stars()
            .iter()
            .enumerate()
            .map(|(i, star)| {
                let vertices = allocator
                    .create_vertex_buffer(&format!("shooting-star-{i}"), &segment_vertices(star));
                let (uniform_buffer, bind_group) = allocator.create_uniform_binding(
                    &format!("shooting-star-{i}-draw"),
                    &layouts.draw,
                    &streak_uniform(star),
                );
                StreakDraw {
                    vertices,
                    uniform_buffer,
                    bind_group,
                    visible: false,
                }
            })
            .collect::<Vec<_>>();

        log::info!(
            "Starfield renderer initialized: {} + {} point sprites, {} streaks, {:?}",
            clouds[0].instance_count,
            clouds[1].instance_count,
            streaks.len(),
            surface_format
        );

        Ok(Self {
            points,
            lines,
            camera_buffer,
            camera_bind_group,
            sprite,
            clouds,
            streaks,
        })
    }

    /// Upload this frame's camera, cloud transforms, and streak segments.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        scene: &StarfieldScene,
        camera: &Camera,
        viewport: FrameViewport,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&camera.to_uniform()),
        );

        let rotations = [scene.star_rotation(), scene.particle_rotation()];
        for (cloud, rotation) in self.clouds.iter().zip(rotations) {
            let uniform =
                point_uniform(&cloud.desc, rotation, viewport.size, viewport.scale_factor);
            queue.write_buffer(&cloud.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }

        for (streak, star) in self.streaks.iter_mut().zip(scene.shooting_stars()) {
            streak.visible = star.is_active() && star.opacity() > 0.0;
            if !streak.visible {
                continue;
            }
            queue.write_buffer(
                &streak.vertices,
                0,
                bytemuck::cast_slice(&segment_vertices(star)),
            );
            queue.write_buffer(
                &streak.uniform_buffer,
                0,
                bytemuck::bytes_of(&streak_uniform(star)),
            );
        }
    }

    /// Record draw calls into an already-begun render pass.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        for cloud in &self.clouds {
            draw_points(
                pass,
                &self.points,
                &self.camera_bind_group,
                &cloud.bind_group,
                &self.sprite.bind_group,
                &cloud.instances,
                cloud.instance_count,
            );
        }

        for streak in self.streaks.iter().filter(|s| s.visible) {
            draw_lines(
                pass,
                &self.lines,
                &self.camera_bind_group,
                &streak.bind_group,
                &streak.vertices,
                2,
            );
        }
    }

    /// Number of streaks that will be drawn this frame.
    pub fn visible_streaks(&self) -> usize {
        self.streaks.iter().filter(|s| s.visible).count()
    }
}

fn point_uniform(
    desc: &PointCloudDescriptor,
    rotation: CloudRotation,
    size: (u32, u32),
    scale_factor: f32,
) -> DrawUniform {
    DrawUniform::new(
        rotation.model_matrix(),
        desc.material.color,
        desc.material.opacity,
    )
    .with_point_size(desc.material.size * scale_factor, size)
}

fn streak_uniform(star: &ShootingStar) -> DrawUniform {
    DrawUniform::new(glam::Mat4::IDENTITY, STREAK_COLOR, star.opacity())
}

fn segment_vertices(star: &ShootingStar) -> [LineVertex; 2] {
    star.segment().map(LineVertex::from)
}
