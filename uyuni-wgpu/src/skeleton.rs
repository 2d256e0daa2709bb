//! Draws `spine2d` draw lists in pixel space.

use spine2d::{BlendMode, DrawList};

use crate::{PassTarget, TextureProvider};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SkeletonVertex {
    position: [f32; 2],
    uv: [f32; 2],
    color: [f32; 4],
    dark_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Projection {
    clip_from_world: [[f32; 4]; 4],
}

const BLEND_MODES: [BlendMode; 4] = [
    BlendMode::Normal,
    BlendMode::Additive,
    BlendMode::Multiply,
    BlendMode::Screen,
];

fn blend_index(blend: BlendMode) -> usize {
    match blend {
        BlendMode::Normal => 0,
        BlendMode::Additive => 1,
        BlendMode::Multiply => 2,
        BlendMode::Screen => 3,
    }
}

/// Indices worth drawing from `draw_list`; a list missing either half draws nothing.
pub(crate) fn uploaded_index_count(draw_list: &DrawList) -> usize {
    if draw_list.vertices.is_empty() {
        return 0;
    }
    draw_list.indices.len()
}

pub struct SkeletonPass {
    /// Straight-alpha pipelines, indexed by [`blend_index`].
    straight: Vec<wgpu::RenderPipeline>,
    premultiplied: Vec<wgpu::RenderPipeline>,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
    index_count: usize,
}

impl SkeletonPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("uyuni skeleton shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let projection_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uyuni skeleton projection layout"),
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
            label: Some("uyuni skeleton pipeline layout"),
            bind_group_layouts: &[&projection_layout, texture_layout],
            push_constant_ranges: &[],
        });

        let build = |premultiplied: bool| {
            BLEND_MODES
                .iter()
                .map(|&blend| {
                    create_pipeline(
                        device,
                        &pipeline_layout,
                        &shader,
                        color_format,
                        blend,
                        premultiplied,
                    )
                })
                .collect::<Vec<_>>()
        };
        let straight = build(false);
        let premultiplied = build(true);

        let projection_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uyuni skeleton projection"),
            size: std::mem::size_of::<Projection>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uyuni skeleton projection bind group"),
            layout: &projection_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        let vertex_capacity = 1024;
        let index_capacity = 2048;
        Self {
            straight,
            premultiplied,
            projection_buffer,
            projection_bind_group,
            vertex_buffer: create_vertex_buffer(device, vertex_capacity),
            index_buffer: create_index_buffer(device, index_capacity),
            vertex_capacity,
            index_capacity,
            index_count: 0,
        }
    }

    pub fn set_projection(&self, queue: &wgpu::Queue, clip_from_world: [[f32; 4]; 4]) {
        queue.write_buffer(
            &self.projection_buffer,
            0,
            bytemuck::bytes_of(&Projection { clip_from_world }),
        );
    }

    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, draw_list: &DrawList) {
        self.index_count = uploaded_index_count(draw_list);
        if self.index_count == 0 {
            return;
        }

        let vertices = draw_list
            .vertices
            .iter()
            .map(|v| SkeletonVertex {
                position: v.position,
                uv: v.uv,
                color: v.color,
                dark_color: v.dark_color,
            })
            .collect::<Vec<_>>();

        if vertices.len() > self.vertex_capacity {
            self.vertex_capacity = vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }
        if draw_list.indices.len() > self.index_capacity {
            self.index_capacity = draw_list.indices.len().next_power_of_two();
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }

        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        queue.write_buffer(
            &self.index_buffer,
            0,
            bytemuck::cast_slice(&draw_list.indices),
        );
    }

    /// Replays the draws of the list last passed to [`SkeletonPass::upload`].
    pub fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        draw_list: &'a DrawList,
        textures: &'a dyn TextureProvider,
    ) {
        if self.index_count == 0 {
            return;
        }

        pass.set_bind_group(0, &self.projection_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for draw in &draw_list.draws {
            let Some(bind_group) = textures.bind_group_for(&draw.texture_path) else {
                continue;
            };
            let pipelines = if draw.premultiplied_alpha {
                &self.premultiplied
            } else {
                &self.straight
            };
            pass.set_pipeline(&pipelines[blend_index(draw.blend)]);
            pass.set_bind_group(1, bind_group, &[]);
            let start = draw.first_index as u32;
            let end = (draw.first_index + draw.index_count) as u32;
            pass.draw_indexed(start..end, 0, 0..1);
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("uyuni skeleton vertices"),
        size: (capacity * std::mem::size_of::<SkeletonVertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("uyuni skeleton indices"),
        size: (capacity * std::mem::size_of::<u32>()) as u64,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    blend: BlendMode,
    premultiplied: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("uyuni skeleton pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SkeletonVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x2,
                    1 => Float32x2,
                    2 => Float32x4,
                    3 => Float32x4
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(blend_state(blend, premultiplied)),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        // Skeletons only ever draw into the container.
        multisample: PassTarget::Container.multisample(),
        multiview: None,
        cache: None,
    })
}

/// Same factors as the spine-webgl runtime; alpha always uses `ONE` as source.
fn blend_state(blend: BlendMode, premultiplied: bool) -> wgpu::BlendState {
    use wgpu::{BlendComponent, BlendFactor, BlendOperation};

    let source = if premultiplied {
        BlendFactor::One
    } else {
        BlendFactor::SrcAlpha
    };
    let (src_color, dst) = match blend {
        BlendMode::Normal => (source, BlendFactor::OneMinusSrcAlpha),
        BlendMode::Additive => (source, BlendFactor::One),
        BlendMode::Multiply => (BlendFactor::Dst, BlendFactor::OneMinusSrcAlpha),
        BlendMode::Screen => (BlendFactor::One, BlendFactor::OneMinusSrc),
    };

    wgpu::BlendState {
        color: BlendComponent {
            src_factor: src_color,
            dst_factor: dst,
            operation: BlendOperation::Add,
        },
        alpha: BlendComponent {
            src_factor: BlendFactor::One,
            dst_factor: dst,
            operation: BlendOperation::Add,
        },
    }
}

const SHADER: &str = r#"
struct Projection {
  clip_from_world: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> projection: Projection;

struct VsIn {
  @location(0) position: vec2<f32>,
  @location(1) uv: vec2<f32>,
  @location(2) light_color: vec4<f32>,
  @location(3) dark_color: vec4<f32>,
};

struct VsOut {
  @builtin(position) position: vec4<f32>,
  @location(0) uv: vec2<f32>,
  @location(1) light_color: vec4<f32>,
  @location(2) dark_color: vec4<f32>,
};

@vertex
fn vs_main(in: VsIn) -> VsOut {
  var out: VsOut;
  out.position = projection.clip_from_world * vec4<f32>(in.position, 0.0, 1.0);
  out.uv = in.uv;
  out.light_color = in.light_color;
  out.dark_color = in.dark_color;
  return out;
}

@group(1) @binding(0)
var tex: texture_2d<f32>;

@group(1) @binding(1)
var samp: sampler;

// Two-color tinting: dark color fills where the texture is dark.
@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
  let texel = textureSample(tex, samp, in.uv);
  let alpha = texel.a * in.light_color.a;
  let rgb = ((texel.a - 1.0) * in.dark_color.a + 1.0 - texel.rgb) * in.dark_color.rgb
    + texel.rgb * in.light_color.rgb;
  return vec4<f32>(rgb, alpha);
}
"#;
