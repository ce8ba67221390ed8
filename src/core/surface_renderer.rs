use glam::Mat4;
use log::{debug, info, warn};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, RenderPipeline, Sampler, Surface, SurfaceConfiguration, Texture, TextureView};
use winit::window::Window;

use super::gpu_context::GpuContext;
use crate::loaders::TextureData;
use crate::math::ClearColor;
use crate::terrain::{TerrainMesh, TerrainVertex};
use crate::traits::{FramePlan, Primitive, Renderer, TextureSlot};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// Plan matrices use GL clip depth [-1, 1]; wgpu clips to [0, 1]
#[rustfmt::skip]
const GL_TO_WGPU_DEPTH: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

const TERRAIN_ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x2,
];

/// Per-frame uniforms of the terrain pass
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct TerrainUniform {
    mvp: [[f32; 4]; 4],
    fog: [f32; 4],
}

impl TerrainUniform {
    /// Uniforms for the plan's terrain draw, `None` when the plan has none
    fn from_plan(plan: &FramePlan) -> Option<Self> {
        let model = plan
            .commands
            .iter()
            .find(|c| c.primitive == Primitive::Terrain)?
            .transform;
        let mvp = GL_TO_WGPU_DEPTH * plan.projection * plan.view * model;
        let ClearColor { r, g, b, .. } = plan.clear_color;
        Some(Self {
            mvp: mvp.to_cols_array_2d(),
            fog: [r, g, b, if plan.toggles.fog { 1.0 } else { 0.0 }],
        })
    }
}

/// Terrain geometry resident on the GPU
struct TerrainBuffers {
    vertices: Buffer,
    indices: Buffer,
    index_count: u32,
}

/// Window renderer
///
/// Clears to the frame's sky color and draws the terrain mesh, shaded
/// through the terrain gradient texture. The wireframe toggle switches to
/// line rasterisation when the device supports it. Other primitives are
/// left to the recording renderer.
pub struct SkyRenderer {
    gpu: Arc<GpuContext>,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    depth_view: TextureView,
    fill_pipeline: RenderPipeline,
    line_pipeline: Option<RenderPipeline>,
    bind_group_layout: BindGroupLayout,
    bind_group: BindGroup,
    uniform_buffer: Buffer,
    sampler: Sampler,
    _gradient: Texture,
    terrain: Option<TerrainBuffers>,
}

impl SkyRenderer {
    /// Create a renderer for a window
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let gpu = Arc::new(pollster::block_on(GpuContext::new_with_surface(&instance, &surface))?);

        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or("Surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);

        let device = gpu.device();
        let depth_view = Self::create_depth_view(device, &surface_config);
        let bind_group_layout = Self::create_bind_group_layout(device);
        let fill_pipeline =
            Self::create_terrain_pipeline(device, &bind_group_layout, surface_format, wgpu::PolygonMode::Fill);
        let line_pipeline = device
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE)
            .then(|| Self::create_terrain_pipeline(device, &bind_group_layout, surface_format, wgpu::PolygonMode::Line));
        if line_pipeline.is_none() {
            info!("line polygon mode unsupported, wireframe toggle draws filled");
        }

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Terrain Uniform Buffer"),
            size: std::mem::size_of::<TerrainUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Plain white until the terrain gradient is registered
        let placeholder = TextureData {
            width: 1,
            height: 1,
            data: vec![255; 4],
        };
        let gradient = Self::upload_rgba(&gpu, &placeholder);
        let bind_group = Self::create_bind_group(device, &bind_group_layout, &uniform_buffer, &gradient, &sampler);

        Ok(Self {
            gpu,
            surface,
            surface_config,
            depth_view,
            fill_pipeline,
            line_pipeline,
            bind_group_layout,
            bind_group,
            uniform_buffer,
            sampler,
            _gradient: gradient,
            terrain: None,
        })
    }

    /// Get current surface dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn create_depth_view(device: &wgpu::Device, config: &SurfaceConfiguration) -> TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth"),
                size: wgpu::Extent3d {
                    width: config.width,
                    height: config.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_bind_group_layout(device: &wgpu::Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("terrain_bind_group_layout"),
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &BindGroupLayout,
        uniforms: &Buffer,
        gradient: &Texture,
        sampler: &Sampler,
    ) -> BindGroup {
        let gradient_view = gradient.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&gradient_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("terrain_bind_group"),
        })
    }

    fn create_terrain_pipeline(
        device: &wgpu::Device,
        layout: &BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        polygon_mode: wgpu::PolygonMode,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Terrain Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("terrain.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Terrain Pipeline Layout"),
            bind_group_layouts: &[layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Terrain Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<TerrainVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &TERRAIN_ATTRIBS,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn upload_rgba(gpu: &GpuContext, texture: &TextureData) -> Texture {
        let size = wgpu::Extent3d {
            width: texture.width,
            height: texture.height,
            depth_or_array_layers: 1,
        };
        let gpu_texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Scene Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue().write_texture(
            gpu_texture.as_image_copy(),
            &texture.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * texture.width),
                rows_per_image: Some(texture.height),
            },
            size,
        );
        gpu_texture
    }

    fn upload_terrain(&mut self, mesh: &TerrainMesh) -> Result<()> {
        let index_count = u32::try_from(mesh.indices.len())?;
        let device = self.gpu.device();
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Vertex Buffer"),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Index Buffer"),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        info!(
            "terrain uploaded: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        self.terrain = Some(TerrainBuffers {
            vertices,
            indices,
            index_count,
        });
        Ok(())
    }

    fn upload_texture(&mut self, slot: TextureSlot, texture: &TextureData) -> Result<()> {
        let expected_size = (texture.width * texture.height * 4) as usize;
        if texture.data.len() != expected_size {
            return Err(format!(
                "Invalid pixel buffer size for {:?}: expected {} bytes, got {}",
                slot,
                expected_size,
                texture.data.len()
            )
            .into());
        }

        // Only the terrain pass samples a texture here
        if slot != TextureSlot::TerrainGradient {
            debug!("texture {:?} has no consumer in the terrain pass, skipped", slot);
            return Ok(());
        }

        let gradient = Self::upload_rgba(&self.gpu, texture);
        self.bind_group = Self::create_bind_group(
            self.gpu.device(),
            &self.bind_group_layout,
            &self.uniform_buffer,
            &gradient,
            &self.sampler,
        );
        self._gradient = gradient;
        debug!("texture {:?} bound ({}x{})", slot, texture.width, texture.height);
        Ok(())
    }

    fn present(&self, clear: ClearColor, draw_terrain: bool, wireframe: bool) -> Result<()> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sky Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sky Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(terrain) = self.terrain.as_ref().filter(|_| draw_terrain) {
                let pipeline = match &self.line_pipeline {
                    Some(lines) if wireframe => lines,
                    _ => &self.fill_pipeline,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(0, terrain.vertices.slice(..));
                render_pass.set_index_buffer(terrain.indices.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..terrain.index_count, 0, 0..1);
            }
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        surface_texture.present();

        Ok(())
    }
}

impl Renderer for SkyRenderer {
    fn register_terrain(&mut self, mesh: &TerrainMesh) -> anyhow::Result<()> {
        self.upload_terrain(mesh)
            .map_err(|e| anyhow::anyhow!("terrain upload failed: {}", e))
    }

    fn register_texture(&mut self, slot: TextureSlot, texture: &TextureData) -> anyhow::Result<()> {
        self.upload_texture(slot, texture)
            .map_err(|e| anyhow::anyhow!("texture upload failed: {}", e))
    }

    fn render(&mut self, plan: &FramePlan) -> anyhow::Result<()> {
        let uniform = TerrainUniform::from_plan(plan);
        if let Some(uniform) = &uniform {
            self.gpu
                .queue()
                .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniform));
        }
        self.present(plan.clear_color, uniform.is_some(), plan.toggles.wireframe)
            .map_err(|e| anyhow::anyhow!("present failed: {}", e))
    }

    /// Resize the surface
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(self.gpu.device(), &self.surface_config);
        self.depth_view = Self::create_depth_view(self.gpu.device(), &self.surface_config);
    }
}
