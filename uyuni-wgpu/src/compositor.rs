use spine2d::DrawList;
use uyuni::{Scene, Viewport, pixel_projection};

use crate::{
    Quad, QuadPass, ReflectionPass, ReflectionUniforms, SkeletonPass, TextureProvider,
    create_texture_bind_group_layout,
};

const BACKDROP_SLOT: usize = 0;
const BACKGROUND_SLOT: usize = 1;

/// Samples per pixel of the offscreen container target.
pub const CONTAINER_SAMPLE_COUNT: u32 = 4;

/// Which pass a pipeline draws into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassTarget {
    /// The multisampled offscreen target holding the filtered container.
    Container,
    /// The swapchain texture.
    Stage,
}

impl PassTarget {
    pub fn multisample(self) -> wgpu::MultisampleState {
        let count = match self {
            PassTarget::Container => CONTAINER_SAMPLE_COUNT,
            PassTarget::Stage => 1,
        };
        wgpu::MultisampleState {
            count,
            ..Default::default()
        }
    }
}

/// The skeleton's geometry for this frame, already uploaded.
pub struct SkeletonFrame<'a> {
    pub draw_list: &'a DrawList,
    pub textures: &'a dyn TextureProvider,
}

/// Renders a [`Scene`]: backdrop first, then the filtered container through
/// the reflection pass.
pub struct SceneRenderer {
    texture_layout: wgpu::BindGroupLayout,
    quads: QuadPass,
    skeleton: SkeletonPass,
    reflection: ReflectionPass,
    linear_output: bool,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let texture_layout = create_texture_bind_group_layout(device);
        Self {
            quads: QuadPass::new(device, queue, color_format, &texture_layout),
            skeleton: SkeletonPass::new(device, color_format, &texture_layout),
            reflection: ReflectionPass::new(device, color_format, &texture_layout, width, height),
            texture_layout,
            linear_output: color_format.is_srgb(),
        }
    }

    /// Layout to build background and atlas page bind groups against.
    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.reflection.resize(device, width, height);
    }

    pub fn upload_skeleton(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        draw_list: &DrawList,
    ) {
        self.skeleton.upload(device, queue, draw_list);
    }

    /// Draws `scene` onto `target`. `stage` is the live logical size of the
    /// canvas: it drives the projection and the shader dimensions, while the
    /// scene layout may still be waiting on a debounced resize.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        stage: Viewport,
        scene: &Scene,
        background: &wgpu::BindGroup,
        skeleton: Option<SkeletonFrame<'_>>,
    ) {
        let projection = pixel_projection(stage);
        self.quads.set_projection(queue, projection);
        self.skeleton.set_projection(queue, projection);

        let mut backdrop_color = scene.backdrop.rgba();
        if self.linear_output {
            for c in &mut backdrop_color[..3] {
                *c = srgb_to_linear(*c);
            }
        }
        self.quads.write(
            queue,
            BACKDROP_SLOT,
            &Quad {
                rect: scene.backdrop.rect(),
                color: backdrop_color,
            },
        );

        let sprite = &scene.container.background;
        self.quads.write(
            queue,
            BACKGROUND_SLOT,
            &Quad {
                rect: sprite.bounds(),
                color: [1.0, 1.0, 1.0, sprite.alpha],
            },
        );

        self.reflection.write_uniforms(
            queue,
            &ReflectionUniforms::new(&scene.container.filter, stage),
        );

        {
            let (view, resolve) = self.reflection.container_attachment();
            let mut pass = begin_pass(
                encoder,
                "uyuni container pass",
                view,
                Some(resolve),
                wgpu::Color::TRANSPARENT,
            );
            if sprite.alpha > 0.0 {
                self.quads.draw(
                    &mut pass,
                    PassTarget::Container,
                    BACKGROUND_SLOT,
                    Some(background),
                );
            }
            if let Some(frame) = skeleton {
                self.skeleton.draw(&mut pass, frame.draw_list, frame.textures);
            }
        }

        let mut pass = begin_pass(
            encoder,
            "uyuni stage pass",
            target,
            None,
            wgpu::Color::BLACK,
        );
        self.quads
            .draw(&mut pass, PassTarget::Stage, BACKDROP_SLOT, None);
        self.reflection.draw(&mut pass);
    }
}

fn begin_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    view: &wgpu::TextureView,
    resolve_target: Option<&wgpu::TextureView>,
    clear: wgpu::Color,
) -> wgpu::RenderPass<'e> {
    // A multisampled view only has to live until it is resolved.
    let store = if resolve_target.is_some() {
        wgpu::StoreOp::Discard
    } else {
        wgpu::StoreOp::Store
    };
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target,
            depth_slice: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
