use super::helpers;
use glam::Mat4;
use globe_core::DirectionalLight;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ShadowUniforms {
    pub(crate) light_view_proj: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
}

/// Depth-only pass from the sun's orthographic camera.
pub(crate) struct ShadowResources {
    /// `None` when the scene has no shadow-casting light; the pass is skipped.
    pub(crate) light_view_proj: Option<Mat4>,
    pub(crate) map_size: u32,
    _map_tex: wgpu::Texture,
    pub(crate) map_view: wgpu::TextureView,
    pub(crate) compare_sampler: wgpu::Sampler,
    pub(crate) bgl: wgpu::BindGroupLayout,
    pub(crate) pipeline: wgpu::RenderPipeline,
}

pub(crate) fn create_shadow_resources(
    device: &wgpu::Device,
    light: Option<&DirectionalLight>,
) -> ShadowResources {
    let light_view_proj = light.and_then(DirectionalLight::shadow_view_projection);
    let map_size = light
        .and_then(|l| l.shadow)
        .map(|s| s.map_size)
        .unwrap_or(1);
    let (map_tex, map_view) = helpers::create_depth_texture(
        device,
        "shadow_map",
        map_size,
        map_size,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
    );
    let compare_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("shadow_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        compare: Some(wgpu::CompareFunction::LessEqual),
        ..Default::default()
    });

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("shadow_shader"),
        source: wgpu::ShaderSource::Wgsl(globe_core::SHADOW_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("shadow_bgl"),
        entries: &[helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX)],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("shadow_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("shadow_pipeline"),
        layout: Some(&pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[helpers::vertex_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            // casters render their far side into the map to keep lit faces clean
            cull_mode: Some(wgpu::Face::Front),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: helpers::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState {
                constant: 2,
                slope_scale: 2.0,
                clamp: 0.0,
            },
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: None,
        cache: None,
        multiview: None,
    });
    if let Some(l) = light {
        log::info!(
            "[gpu] shadow map {}x{} from ({:.1},{:.1},{:.1})",
            map_size,
            map_size,
            l.position.x,
            l.position.y,
            l.position.z
        );
    }

    ShadowResources {
        light_view_proj,
        map_size,
        _map_tex: map_tex,
        map_view,
        compare_sampler,
        bgl,
        pipeline,
    }
}

impl ShadowResources {
    #[inline]
    pub(crate) fn enabled(&self) -> bool {
        self.light_view_proj.is_some()
    }

    pub(crate) fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        draws: &[super::mesh::MeshDraw],
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("shadow_pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.map_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.pipeline);
        for d in draws.iter().filter(|d| d.cast_shadow) {
            pass.set_bind_group(0, &d.shadow_bind_group, &[]);
            pass.set_vertex_buffer(0, d.vertex_buffer.slice(..));
            pass.set_index_buffer(d.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..d.index_count, 0, 0..1);
        }
    }
}
