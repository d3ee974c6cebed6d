//! Global uniform bindings for camera and scene data
//!
//! Per-frame state shared by every object in the scene: the camera
//! matrices and the Phong lighting parameters. Bound to slot 0 in both
//! render pipelines.

use crate::{
    config::LightingConfig,
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `surface.wgsl` and `light.wgsl`.
/// Every field is a full vec4 so no manual padding is needed.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    /// Ambient color with strength applied, w unused
    ambient: [f32; 4],
    light1_position: [f32; 4],
    light1_color: [f32; 4],
    light2_position: [f32; 4],
    light2_color: [f32; 4],
    /// x: specular intensity, y: highlight size, zw: uv scale
    specular: [f32; 4],
}
// 16 + 64 + 6 * 16 = 176 bytes

fn extend(v: [f32; 3], w: f32) -> [f32; 4] {
    [v[0], v[1], v[2], w]
}

impl GlobalUBOContent {
    pub fn new(camera: &CameraUniform, lighting: &LightingConfig) -> Self {
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: extend(lighting.ambient(), 1.0),
            light1_position: extend(lighting.primary.position, 1.0),
            light1_color: extend(lighting.primary.color, 1.0),
            light2_position: extend(lighting.secondary.position, 1.0),
            light2_color: extend(lighting.secondary.color, 1.0),
            specular: [
                lighting.specular_intensity,
                lighting.highlight_size,
                lighting.uv_scale[0],
                lighting.uv_scale[1],
            ],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Writes this frame's camera and lighting into the global uniform buffer
///
/// Unchanged content is not re-uploaded, so a still camera costs nothing.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: &CameraUniform,
    lighting: &LightingConfig,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, lighting));
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    fn create_layout(device: &wgpu::Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout")
    }

    /// Creates the layout and binds `ubo` to it
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = Self::create_layout(device);
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PointLight;

    #[test]
    fn test_content_size_matches_shader() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 176);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>() % 16, 0);
    }

    #[test]
    fn test_content_from_lighting() {
        let lighting = LightingConfig::default()
            .with_lights(
                PointLight {
                    position: [1.0, 2.0, 3.0],
                    color: [0.1, 0.2, 0.3],
                },
                PointLight {
                    position: [4.0, 5.0, 6.0],
                    color: [1.0, 1.0, 1.0],
                },
            )
            .with_specular(0.25, 8.0);
        let camera = CameraUniform {
            view_position: [7.0, 8.0, 9.0, 1.0],
            ..Default::default()
        };

        let content = GlobalUBOContent::new(&camera, &lighting);
        assert_eq!(content.view_position, [7.0, 8.0, 9.0, 1.0]);
        assert_eq!(content.light1_position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(content.light1_color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(content.light2_position, [4.0, 5.0, 6.0, 1.0]);
        assert_eq!(content.specular, [0.25, 8.0, 1.0, 1.0]);
        assert!((content.ambient[0] - 0.15).abs() < 1e-6);
    }
}
