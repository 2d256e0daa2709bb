//! Textured, tinted rectangles: the backdrop and the background sprite.

use uyuni::Rect;

use crate::PassTarget;

/// Quads uploaded per frame.
const QUAD_SLOTS: usize = 2;
const VERTICES_PER_QUAD: usize = 6;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    uv: [f32; 2],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Projection {
    clip_from_world: [[f32; 4]; 4],
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad {
    pub rect: Rect,
    /// Linear RGBA multiplied with the texture.
    pub color: [f32; 4],
}

impl Quad {
    fn vertices(&self) -> [QuadVertex; VERTICES_PER_QUAD] {
        let [x1, y1] = self.rect.max();
        let (x0, y0) = (self.rect.x, self.rect.y);
        let v = |x: f32, y: f32, u: f32, w: f32| QuadVertex {
            position: [x, y],
            uv: [u, w],
            color: self.color,
        };
        [
            v(x0, y0, 0.0, 0.0),
            v(x1, y0, 1.0, 0.0),
            v(x1, y1, 1.0, 1.0),
            v(x1, y1, 1.0, 1.0),
            v(x0, y1, 0.0, 1.0),
            v(x0, y0, 0.0, 0.0),
        ]
    }
}

pub struct QuadPass {
    stage_pipeline: wgpu::RenderPipeline,
    container_pipeline: wgpu::RenderPipeline,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    white: wgpu::BindGroup,
}

impl QuadPass {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("uyuni quad shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let projection_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uyuni quad projection layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("uyuni quad pipeline layout"),
            bind_group_layouts: &[&projection_layout, texture_layout],
            push_constant_ranges: &[],
        });

        let build = |target: PassTarget| {
            create_pipeline(device, &pipeline_layout, &shader, color_format, target)
        };
        let stage_pipeline = build(PassTarget::Stage);
        let container_pipeline = build(PassTarget::Container);

        let projection_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uyuni quad projection"),
            size: std::mem::size_of::<Projection>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uyuni quad projection bind group"),
            layout: &projection_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uyuni quad vertices"),
            size: (QUAD_SLOTS * VERTICES_PER_QUAD * std::mem::size_of::<QuadVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Solid fills sample a single white texel.
        let white_view = crate::upload_rgba8(device, queue, "uyuni white texel", 1, 1, &[255; 4]);
        let white_sampler = crate::create_linear_sampler(device, "uyuni white sampler");
        let white =
            crate::create_texture_bind_group(device, texture_layout, &white_view, &white_sampler);

        Self {
            stage_pipeline,
            container_pipeline,
            projection_buffer,
            projection_bind_group,
            vertex_buffer,
            white,
        }
    }

    pub fn set_projection(&self, queue: &wgpu::Queue, clip_from_world: [[f32; 4]; 4]) {
        queue.write_buffer(
            &self.projection_buffer,
            0,
            bytemuck::bytes_of(&Projection { clip_from_world }),
        );
    }

    /// Writes `quad` into `slot`; slots are drawn independently with [`QuadPass::draw`].
    pub fn write(&self, queue: &wgpu::Queue, slot: usize, quad: &Quad) {
        debug_assert!(slot < QUAD_SLOTS);
        let offset = slot * VERTICES_PER_QUAD * std::mem::size_of::<QuadVertex>();
        queue.write_buffer(
            &self.vertex_buffer,
            offset as u64,
            bytemuck::cast_slice(&quad.vertices()),
        );
    }

    /// Draws `slot` sampling `texture`, or a solid fill when `texture` is `None`.
    pub fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        target: PassTarget,
        slot: usize,
        texture: Option<&'a wgpu::BindGroup>,
    ) {
        let first = (slot * VERTICES_PER_QUAD) as u32;
        let pipeline = match target {
            PassTarget::Stage => &self.stage_pipeline,
            PassTarget::Container => &self.container_pipeline,
        };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.projection_bind_group, &[]);
        pass.set_bind_group(1, texture.unwrap_or(&self.white), &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(first..first + VERTICES_PER_QUAD as u32, 0..1);
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    target: PassTarget,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("uyuni quad pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x2,
                    1 => Float32x2,
                    2 => Float32x4
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState {
                    color: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::SrcAlpha,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                    alpha: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::One,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: target.multisample(),
        multiview: None,
        cache: None,
    })
}

const SHADER: &str = r#"
struct Projection {
  clip_from_world: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> projection: Projection;

struct VsOut {
  @builtin(position) position: vec4<f32>,
  @location(0) uv: vec2<f32>,
  @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(
  @location(0) position: vec2<f32>,
  @location(1) uv: vec2<f32>,
  @location(2) color: vec4<f32>,
) -> VsOut {
  var out: VsOut;
  out.position = projection.clip_from_world * vec4<f32>(position, 0.0, 1.0);
  out.uv = uv;
  out.color = color;
  return out;
}

@group(1) @binding(0)
var tex: texture_2d<f32>;

@group(1) @binding(1)
var samp: sampler;

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
  return textureSample(tex, samp, in.uv) * in.color;
}
"#;
