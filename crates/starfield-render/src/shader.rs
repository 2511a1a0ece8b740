//! WGSL shader module compilation.

use log::debug;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

/// Compile a WGSL source string into a labelled shader module.
///
/// Invalid WGSL surfaces through the device's uncaptured error handler.
pub fn compile_wgsl(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    debug!("Compiling shader '{label}' ({} bytes)", source.len());
    device.create_shader_module(ShaderModuleDescriptor {
        label: Some(label),
        source: ShaderSource::Wgsl(source.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{
        LINE_SHADER_SOURCE, LinePipeline, POINT_SPRITE_SHADER_SOURCE, PointSpritePipeline,
        StarfieldLayouts,
    };
    use crate::test_support::create_test_device;

    #[test]
    fn test_starfield_shaders_build_pipelines() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let format = wgpu::TextureFormat::Bgra8UnormSrgb;
        let layouts = StarfieldLayouts::new(&device);
        let points = compile_wgsl(&device, "point-sprite", POINT_SPRITE_SHADER_SOURCE);
        let lines = compile_wgsl(&device, "line", LINE_SHADER_SOURCE);
        PointSpritePipeline::new(&device, &points, format, &layouts);
        LinePipeline::new(&device, &lines, format, &layouts);
    }
}
