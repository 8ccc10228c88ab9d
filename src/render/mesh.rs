use super::helpers;
use super::shadow::{ShadowResources, ShadowUniforms};
use glam::Mat4;
use globe_core::Mesh;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) light_view_proj: [[f32; 4]; 4],
    pub(crate) camera_pos: [f32; 4],
    pub(crate) sun_dir: [f32; 4],
    pub(crate) sun_color: [f32; 4],
    pub(crate) ambient: [f32; 4],
    pub(crate) shadow: [f32; 4],
}

/// GPU copy of one scene mesh at a fixed world transform.
pub(crate) struct MeshDraw {
    pub(crate) model: Mat4,
    pub(crate) cast_shadow: bool,
    pub(crate) receive_shadow: bool,
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    _shadow_uniform_buffer: wgpu::Buffer,
    pub(crate) shadow_bind_group: wgpu::BindGroup,
}

/// Layouts and shader shared by every mesh in the main pass.
pub(crate) struct MeshPass {
    pub(crate) shader: wgpu::ShaderModule,
    pub(crate) bgl0: wgpu::BindGroupLayout,
    pub(crate) bgl1: wgpu::BindGroupLayout,
    pub(crate) layout: wgpu::PipelineLayout,
    pub(crate) color_format: wgpu::TextureFormat,
}

pub(crate) fn create_mesh_pass(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> MeshPass {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("globe_shader"),
        source: wgpu::ShaderSource::Wgsl(globe_core::GLOBE_WGSL.into()),
    });
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("mesh_bgl0"),
        entries: &[
            helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Depth,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                count: None,
            },
        ],
    });
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("mesh_bgl1"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
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
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("mesh_pl"),
        bind_group_layouts: &[&bgl0, &bgl1],
        push_constant_ranges: &[],
    });
    MeshPass {
        shader,
        bgl0,
        bgl1,
        layout,
        color_format,
    }
}

impl MeshPass {
    fn pipeline(&self, device: &wgpu::Device, cull_mode: Option<wgpu::Face>) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&self.layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                buffers: &[helpers::vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: helpers::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        })
    }

    pub(crate) fn upload(
        &self,
        device: &wgpu::Device,
        shadow: &ShadowResources,
        index: usize,
        world: Mat4,
        mesh: &Mesh,
    ) -> MeshDraw {
        let geom = &mesh.geometry;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertices"),
            contents: bytemuck::cast_slice(&geom.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&geom.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer =
            helpers::uniform_buffer(device, "mesh_uniforms", std::mem::size_of::<MeshUniforms>());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_bg0"),
            layout: &self.bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow.map_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow.compare_sampler),
                },
            ],
        });
        let shadow_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shadow_uniforms"),
            contents: bytemuck::bytes_of(&ShadowUniforms {
                light_view_proj: shadow
                    .light_view_proj
                    .unwrap_or(Mat4::IDENTITY)
                    .to_cols_array_2d(),
                model: world.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_bg"),
            layout: &shadow.bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: shadow_uniform_buffer.as_entire_binding(),
            }],
        });
        log::debug!(
            "[gpu] mesh #{index}: {} vertices, {} triangles",
            geom.vertices.len(),
            geom.triangle_count()
        );
        MeshDraw {
            model: world,
            cast_shadow: mesh.cast_shadow,
            receive_shadow: mesh.receive_shadow,
            vertex_buffer,
            index_buffer,
            index_count: geom.indices.len() as u32,
            pipeline: self.pipeline(device, helpers::cull_mode(mesh.side)),
            uniform_buffer,
            bind_group,
            _shadow_uniform_buffer: shadow_uniform_buffer,
            shadow_bind_group,
        }
    }
}
