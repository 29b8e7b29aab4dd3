//! Depth-tested mesh pass replaying the draws recorded by [`ShapeMeshes`].
//!
//! Bind groups:
//!
//! | Group | Contents |
//! |-------|----------|
//! | 0 | [`FrameUniforms`]: camera and lights |
//! | 1 | [`ObjectUniforms`], one dynamic offset per draw |
//! | 2 | texture slots and their sampler, from [`GpuTextures`](crate::GpuTextures) |

use std::num::NonZeroU64;

use crate::gpu::GpuContext;
use crate::mesh::{DrawCommand, ShapeMeshes, Vertex3d};
use crate::uniforms::{FrameUniforms, ObjectUniforms};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_OBJECT_CAPACITY: usize = 16;

/// Depth-tested pipeline that replays recorded draws with per-draw uniforms.
pub struct ScenePass {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_stride: u64,
    object_capacity: usize,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl ScenePass {
    pub fn new(gpu: &GpuContext, texture_layout: &wgpu::BindGroupLayout) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        // Frame uniforms (group 0)
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        // Object uniforms (group 1)
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: object_binding_size(),
                },
                count: None,
            }],
        });

        let object_stride = aligned_stride(
            std::mem::size_of::<ObjectUniforms>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let (object_buffer, object_bind_group) =
            create_object_buffer(device, &object_layout, object_stride, INITIAL_OBJECT_CAPACITY);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &object_layout, texture_layout],
            push_constant_ranges: &[],
        });

        // Planes are seen from both sides, so nothing is culled.
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            object_layout,
            object_buffer,
            object_bind_group,
            object_stride,
            object_capacity: INITIAL_OBJECT_CAPACITY,
            depth_view: create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Upload frame uniforms and one object block per draw, growing the
    /// object buffer if this frame has more draws than it holds.
    pub fn prepare(&mut self, gpu: &GpuContext, frame: &FrameUniforms, draws: &[DrawCommand]) {
        gpu.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(frame));

        if draws.is_empty() {
            return;
        }

        if draws.len() > self.object_capacity {
            let capacity = draws.len().next_power_of_two();
            log::debug!("growing object uniform buffer to {capacity} draws");
            let (buffer, bind_group) =
                create_object_buffer(&gpu.device, &self.object_layout, self.object_stride, capacity);
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
            self.object_capacity = capacity;
        }

        let stride = self.object_stride as usize;
        let mut bytes = vec![0u8; stride * draws.len()];
        for (chunk, draw) in bytes.chunks_exact_mut(stride).zip(draws) {
            let block = bytemuck::bytes_of(&draw.object);
            chunk[..block.len()].copy_from_slice(block);
        }
        gpu.queue.write_buffer(&self.object_buffer, 0, &bytes);
    }

    /// Record `draws` into `render_pass`. [`ScenePass::prepare`] must have
    /// been called with the same draws.
    pub fn render(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        textures: &wgpu::BindGroup,
        meshes: &ShapeMeshes,
        draws: &[DrawCommand],
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        render_pass.set_bind_group(2, textures, &[]);

        for (i, draw) in draws.iter().enumerate() {
            let Some(mesh) = meshes.mesh(draw.kind) else {
                continue;
            };
            let offset = (i as u64 * self.object_stride) as u32;
            render_pass.set_bind_group(1, &self.object_bind_group, &[offset]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

/// Round `size` up to a multiple of `alignment`.
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

fn object_binding_size() -> Option<NonZeroU64> {
    NonZeroU64::new(std::mem::size_of::<ObjectUniforms>() as u64)
}

fn create_object_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Uniforms"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: object_binding_size(),
            }),
        }],
    });

    (buffer, bind_group)
}

fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: gpu.width(),
            height: gpu.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
