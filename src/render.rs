use crate::constants::{CLEAR_COLOR, PLACEHOLDER_TEXEL, SHADOW_DEPTH_BIAS};
use glam::{Mat4, Vec3};
use globe_core::{fit_extent, FrameOutput, Scene, TextureImage};
use web_sys as web;

mod helpers;
mod mesh;
mod shadow;
mod targets;
use mesh::{MeshDraw, MeshPass, MeshUniforms};
use shadow::ShadowResources;
use targets::DepthTarget;

/// Light values the mesh shader needs, flattened from the scene once.
#[derive(Clone, Copy, Debug, Default)]
struct Lighting {
    ambient: [f32; 3],
    sun_dir: Vec3,
    sun_color: [f32; 3],
    sun_intensity: f32,
}

impl Lighting {
    fn from_scene(scene: &Scene) -> Self {
        let mut l = Lighting::default();
        if let Some(a) = scene.ambient_light() {
            l.ambient = a.color.map(|c| c * a.intensity);
        }
        if let Some(d) = scene.directional_light() {
            l.sun_dir = d.direction();
            l.sun_color = d.color;
            l.sun_intensity = d.intensity;
        }
        l
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: DepthTarget,
    shadow: ShadowResources,
    pass: MeshPass,
    draws: Vec<MeshDraw>,
    base_sampler: wgpu::Sampler,
    base_bind_group: wgpu::BindGroup,
    lighting: Lighting,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl GpuState {
    /// Creates the surface on `canvas` and uploads every mesh in `scene`.
    ///
    /// Mesh transforms are captured here; the scene is static after startup.
    pub async fn new(canvas: &web::HtmlCanvasElement, scene: &Scene) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let max_dim = device.limits().max_texture_dimension_2d;
        let (width, height) = fit_extent(canvas.width().max(1), canvas.height().max(1), max_dim);
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            // sRGB view lets a linear-only canvas format still encode correctly
            view_formats: vec![format.add_srgb_suffix()],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {width}x{height} {:?}", format);

        let depth = DepthTarget::new(&device, width, height);
        let shadow = shadow::create_shadow_resources(&device, scene.directional_light().as_ref());
        let pass = mesh::create_mesh_pass(&device, format.add_srgb_suffix());
        let draws = scene
            .meshes()
            .into_iter()
            .enumerate()
            .map(|(i, (world, m))| pass.upload(&device, &shadow, i, world, m))
            .collect::<Vec<_>>();

        let base_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("base_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let placeholder = TextureImage::solid(PLACEHOLDER_TEXEL);
        let (_, base_view) = helpers::upload_texture(&device, &queue, "base_map", &placeholder);
        let base_bind_group = base_bind_group(&device, &pass.bgl1, &base_view, &base_sampler);

        let [r, g, b, a] = CLEAR_COLOR;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth,
            shadow,
            pass,
            draws,
            base_sampler,
            base_bind_group,
            lighting: Lighting::from_scene(scene),
            width,
            height,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    /// Largest texture edge the device accepts, for surfaces and images alike.
    #[inline]
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Replaces the globe's base colour map. Images over the device limit are
    /// refused and the current map stays.
    pub fn set_globe_texture(&mut self, image: &TextureImage) {
        let max_dim = self.max_texture_dimension();
        if image.width > max_dim || image.height > max_dim {
            log::warn!(
                "[texture] {}x{} exceeds device limit {max_dim}; keeping current map",
                image.width,
                image.height
            );
            return;
        }
        let (_, view) = helpers::upload_texture(&self.device, &self.queue, "base_map", image);
        self.base_bind_group =
            base_bind_group(&self.device, &self.pass.bgl1, &view, &self.base_sampler);
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let (width, height) = fit_extent(width, height, self.max_texture_dimension());
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth.recreate(&self.device, width, height);
            log::debug!("[gpu] resized to {width}x{height}");
        }
    }

    /// Re-applies the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(&mut self, out: &FrameOutput) -> Result<(), wgpu::SurfaceError> {
        let (w, h) = out.surface_size;
        self.resize_if_needed(w, h);
        self.write_uniforms(out);

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.pass.color_format),
            ..Default::default()
        });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        if self.shadow.enabled() {
            self.shadow.encode(&mut encoder, &self.draws);
        }
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(1, &self.base_bind_group, &[]);
            for d in &self.draws {
                rpass.set_pipeline(&d.pipeline);
                rpass.set_bind_group(0, &d.bind_group, &[]);
                rpass.set_vertex_buffer(0, d.vertex_buffer.slice(..));
                rpass.set_index_buffer(d.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..d.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn write_uniforms(&self, out: &FrameOutput) {
        let l = &self.lighting;
        let light_view_proj = self.shadow.light_view_proj.unwrap_or(Mat4::IDENTITY);
        let texel = 1.0 / self.shadow.map_size as f32;
        for d in &self.draws {
            let receive = self.shadow.enabled() && d.receive_shadow;
            let u = MeshUniforms {
                view_proj: out.view_projection.to_cols_array_2d(),
                model: d.model.to_cols_array_2d(),
                light_view_proj: light_view_proj.to_cols_array_2d(),
                camera_pos: out.camera_position.extend(1.0).to_array(),
                sun_dir: l.sun_dir.extend(l.sun_intensity).to_array(),
                sun_color: [l.sun_color[0], l.sun_color[1], l.sun_color[2], 0.0],
                ambient: [l.ambient[0], l.ambient[1], l.ambient[2], 0.0],
                shadow: [texel, SHADOW_DEPTH_BIAS, if receive { 1.0 } else { 0.0 }, 0.0],
            };
            self.queue
                .write_buffer(&d.uniform_buffer, 0, bytemuck::bytes_of(&u));
        }
    }
}

/// Texture edge limit of `gpu`, or of the default limits requested at
/// startup when there is no device yet.
pub fn max_texture_dimension(gpu: Option<&GpuState>) -> u32 {
    gpu.map(GpuState::max_texture_dimension)
        .unwrap_or(wgpu::Limits::default().max_texture_dimension_2d)
}

fn base_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("base_bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
