//! WGPU-based rendering engine for the table scene
//!
//! Owns the surface, device and queue, the depth buffer, the global uniform
//! buffer and every GPU resource the scene needs: one mesh per
//! [`MeshKind`], one texture per scene texture, and one uniform buffer per
//! object. Objects are drawn with the "Surface" or "Light" pipeline.

use std::{collections::HashMap, path::Path, sync::Arc};

use crate::{
    config::LightingConfig,
    error::RenderError,
    gfx::{
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, GlobalUBOContent},
            texture_resource::TextureResource,
        },
        scene::{
            mesh::{DrawMesh, GpuMesh},
            object::{ObjectGpuResources, Shading},
            scene::{MeshKind, Scene},
        },
    },
    wgpu_utils::binding_builder::BindGroupLayoutWithDesc,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    lighting: LightingConfig,

    object_layout: BindGroupLayoutWithDesc,
    texture_layout: BindGroupLayoutWithDesc,

    meshes: HashMap<MeshKind, GpuMesh>,
    textures: Vec<TextureResource>,
    texture_bind_groups: Vec<wgpu::BindGroup>,
    // Owned for as long as the bind group below samples it
    _white_texture: TextureResource,
    white_bind_group: wgpu::BindGroup,
    objects: Vec<ObjectGpuResources>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Initializes wgpu, creates the depth buffer and the global uniforms,
    /// and builds both render pipelines. The scene is uploaded separately
    /// with [`RenderEngine::load_scene`].
    ///
    /// # Errors
    /// Returns [`RenderError`] if no surface, adapter or device can be
    /// created, or a pipeline fails to build.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        present_mode: wgpu::PresentMode,
        lighting: LightingConfig,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        log::info!("Surface format {:?}", format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new_with_data(
            &device,
            &GlobalUBOContent::new(&Default::default(), &lighting),
        );
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let object_layout = ObjectGpuResources::bind_group_layout(&device);
        let texture_layout = TextureResource::bind_group_layout(&device);

        let white_texture = TextureResource::white(&device, &queue);
        let white_bind_group = white_texture.bind_group(&device, &texture_layout, "White Bind Group");

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("surface", include_str!("surface.wgsl"));
        pipeline_manager.load_shader("light", include_str!("light.wgsl"));

        pipeline_manager.register_pipeline(
            Shading::Surface.pipeline_name(),
            PipelineConfig::default_with_shader("surface")
                .with_label("Surface")
                .with_color_format(format)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.layout.clone(),
                    texture_layout.layout.clone(),
                ]),
        );

        // The light pyramid's faces are not consistently wound
        pipeline_manager.register_pipeline(
            Shading::Light.pipeline_name(),
            PipelineConfig::default_with_shader("light")
                .with_label("Light")
                .with_color_format(format)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.layout.clone(),
                ]),
        );

        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            lighting,
            object_layout,
            texture_layout,
            meshes: HashMap::new(),
            textures: Vec::new(),
            texture_bind_groups: Vec::new(),
            _white_texture: white_texture,
            white_bind_group,
            objects: Vec::new(),
        })
    }

    /// Uploads the scene's meshes, textures and per-object uniforms
    ///
    /// Any resources from a previously loaded scene are released first.
    ///
    /// # Errors
    /// Fails if the scene references a missing texture, a texture file
    /// cannot be loaded, or a mesh configuration is rejected. Resources
    /// created before the failure are released on drop.
    pub fn load_scene(&mut self, scene: &Scene, asset_dir: &Path) -> Result<(), RenderError> {
        scene.validate()?;
        self.objects.clear();
        self.texture_bind_groups.clear();
        self.textures.clear();
        self.meshes.clear();

        for kind in MeshKind::ALL {
            let data = kind.geometry()?;
            self.meshes
                .insert(kind, GpuMesh::build_labeled(&self.device, &data, kind.label()));
        }
        log::info!(
            "Built {} meshes, {} used by the scene",
            self.meshes.len(),
            scene.used_meshes().len()
        );

        for path in scene.texture_paths(asset_dir) {
            let texture = TextureResource::from_path(&self.device, &self.queue, &path)?;
            let label = format!("{} Bind Group", path.display());
            self.texture_bind_groups
                .push(texture.bind_group(&self.device, &self.texture_layout, &label));
            self.textures.push(texture);
        }

        self.objects = scene
            .objects
            .iter()
            .map(|object| ObjectGpuResources::new(&self.device, &self.object_layout, object))
            .collect();
        log::info!(
            "Loaded {} objects with {} textures",
            self.objects.len(),
            self.textures.len()
        );
        Ok(())
    }

    /// Writes the camera, lighting and object uniforms for this frame
    pub fn update(&mut self, scene: &Scene) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            &scene.camera_manager.camera.uniform,
            &self.lighting,
        );
        for (resources, object) in self.objects.iter_mut().zip(&scene.objects) {
            resources.update(&self.queue, object);
        }
    }

    /// Renders one frame of the scene
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped; a
    /// timed out frame is skipped.
    ///
    /// # Errors
    /// Returns [`RenderError::Frame`] when the surface is out of memory or
    /// otherwise unusable.
    pub fn render_frame(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("Surface {}, reconfiguring", err);
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for the next frame");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for shading in [Shading::Surface, Shading::Light] {
                let Some(pipeline) = self.pipeline_manager.get_pipeline(shading.pipeline_name())
                else {
                    log::warn!("Pipeline '{}' missing", shading.pipeline_name());
                    continue;
                };
                render_pass.set_pipeline(pipeline);

                for (object, resources) in scene.objects.iter().zip(&self.objects) {
                    if object.shading != shading {
                        continue;
                    }
                    let Some(mesh) = self.meshes.get(&object.mesh) else {
                        log::warn!("Skipping '{}': mesh not loaded", object.name);
                        continue;
                    };

                    render_pass.set_bind_group(1, &resources.bind_group, &[]);
                    if shading == Shading::Surface {
                        let texture = object
                            .texture
                            .and_then(|index| self.texture_bind_groups.get(index))
                            .unwrap_or(&self.white_bind_group);
                        render_pass.set_bind_group(2, texture, &[]);
                    }
                    render_pass.draw_mesh(mesh);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        log::trace!("Presented frame with {} objects", self.objects.len());
        Ok(())
    }

    /// Resizes the surface and recreates the depth texture
    ///
    /// A zero-sized request, as sent while the window is minimized, is ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }
}
