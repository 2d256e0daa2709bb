//! Water-reflection post-process.
//!
//! The filtered container is rendered into an offscreen target; this pass
//! samples it with a full-screen triangle. Rows above `boundary` pass through
//! unchanged. Rows below are mirrored around the boundary (when `mirror` is
//! set) and displaced horizontally by a cosine wave whose amplitude, wave
//! length and opacity are interpolated from the `[start, end]` ranges as the
//! row moves from the boundary to the bottom edge.

use uyuni::{ReflectionFilter, Viewport};

use crate::CONTAINER_SAMPLE_COUNT;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ReflectionUniforms {
    pub amplitude: [f32; 2],
    pub wave_length: [f32; 2],
    pub alpha: [f32; 2],
    /// Logical size of the filtered area; amplitude and wave length are in these pixels.
    pub dimensions: [f32; 2],
    pub boundary: f32,
    pub time: f32,
    pub mirror: u32,
    pub _pad: u32,
}

impl ReflectionUniforms {
    pub fn new(filter: &ReflectionFilter, stage: Viewport) -> Self {
        Self {
            amplitude: filter.amplitude,
            wave_length: filter.wave_length,
            alpha: filter.alpha,
            dimensions: [stage.width, stage.height],
            boundary: filter.boundary,
            time: filter.time(),
            mirror: u32::from(filter.mirror),
            _pad: 0,
        }
    }
}

pub struct ReflectionPass {
    pipeline: wgpu::RenderPipeline,
    color_format: wgpu::TextureFormat,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    target: ContainerTarget,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

impl ReflectionPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
        width: u32,
        height: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("uyuni reflection shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uyuni reflection uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("uyuni reflection pipeline layout"),
            bind_group_layouts: &[texture_layout, &uniform_layout],
            push_constant_ranges: &[],
        });

        // The offscreen target holds premultiplied color.
        let premultiplied = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        };
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("uyuni reflection pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState {
                        color: premultiplied,
                        alpha: premultiplied,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: crate::PassTarget::Stage.multisample(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uyuni reflection uniforms"),
            size: std::mem::size_of::<ReflectionUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uyuni reflection uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let sampler = crate::create_linear_sampler(device, "uyuni reflection sampler");
        let target =
            ContainerTarget::new(device, color_format, texture_layout, &sampler, width, height);

        Self {
            pipeline,
            color_format,
            texture_layout: texture_layout.clone(),
            sampler,
            target,
            uniform_buffer,
            uniform_bind_group,
            size: (width, height),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if self.size == (width, height) {
            return;
        }
        self.target = ContainerTarget::new(
            device,
            self.color_format,
            &self.texture_layout,
            &self.sampler,
            width,
            height,
        );
        self.size = (width, height);
    }

    /// Multisampled view the filtered container is drawn into, and the view it
    /// resolves to before the reflection samples it.
    pub fn container_attachment(&self) -> (&wgpu::TextureView, &wgpu::TextureView) {
        (&self.target.multisampled, &self.target.resolved)
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &ReflectionUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.target.bind_group, &[]);
        pass.set_bind_group(1, &self.uniform_bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

struct ContainerTarget {
    multisampled: wgpu::TextureView,
    resolved: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

impl ContainerTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> Self {
        let create = |label: &str, sample_count: u32, usage: wgpu::TextureUsages| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width: width.max(1),
                        height: height.max(1),
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        let multisampled = create(
            "uyuni container msaa",
            CONTAINER_SAMPLE_COUNT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let resolved = create(
            "uyuni reflection target",
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let bind_group = crate::create_texture_bind_group(device, layout, &resolved, sampler);
        Self {
            multisampled,
            resolved,
            bind_group,
        }
    }
}

const SHADER: &str = r#"
struct VsOut {
  @builtin(position) position: vec4<f32>,
  @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VsOut {
  let x = f32((index << 1u) & 2u);
  let y = f32(index & 2u);
  var out: VsOut;
  out.position = vec4<f32>(x * 2.0 - 1.0, 1.0 - y * 2.0, 0.0, 1.0);
  out.uv = vec2<f32>(x, y);
  return out;
}

struct Reflection {
  amplitude: vec2<f32>,
  wave_length: vec2<f32>,
  alpha: vec2<f32>,
  dimensions: vec2<f32>,
  boundary: f32,
  time: f32,
  mirror: u32,
  _pad: u32,
};

@group(0) @binding(0)
var scene_tex: texture_2d<f32>;

@group(0) @binding(1)
var samp: sampler;

@group(1) @binding(0)
var<uniform> params: Reflection;

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
  let uv = in.uv;
  let b = params.boundary;
  if (uv.y < b) {
    return textureSampleLevel(scene_tex, samp, uv, 0.0);
  }

  // 0 at the boundary, 1 at the bottom edge.
  let k = (uv.y - b) / (1.0 - b + 0.0001);
  let v = b + b - uv.y;
  let y = select(uv.y, v, params.mirror != 0u);

  let amplitude = mix(params.amplitude.x, params.amplitude.y, k) / params.dimensions.x;
  let wave_length = mix(params.wave_length.x, params.wave_length.y, k) / params.dimensions.y;
  let alpha = mix(params.alpha.x, params.alpha.y, k);

  let x = clamp(uv.x + cos(v * 6.28 / wave_length - params.time) * amplitude, 0.0, 1.0);
  return textureSampleLevel(scene_tex, samp, vec2<f32>(x, y), 0.0) * alpha;
}
"#;
