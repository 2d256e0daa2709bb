use std::collections::HashMap;

/// Layout shared by every sampled texture: `texture_2d` at 0, filtering sampler at 1.
pub fn create_texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("uyuni texture bind group layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
    })
}

pub fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("uyuni texture bind group"),
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

/// Uploads tightly packed RGBA8 pixels as an sRGB texture.
pub fn upload_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        texture.as_image_copy(),
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub fn create_linear_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Resolves the atlas page a skeleton draw samples from.
pub trait TextureProvider {
    fn bind_group_for(&self, texture_path: &str) -> Option<&wgpu::BindGroup>;
}

#[derive(Default)]
pub struct AtlasTextures {
    pub bind_groups: HashMap<String, wgpu::BindGroup>,
}

impl AtlasTextures {
    pub fn is_empty(&self) -> bool {
        self.bind_groups.is_empty()
    }
}

impl TextureProvider for AtlasTextures {
    fn bind_group_for(&self, texture_path: &str) -> Option<&wgpu::BindGroup> {
        self.bind_groups.get(texture_path)
    }
}

pub fn create_sampler_for_atlas_page(
    device: &wgpu::Device,
    page: &spine2d::AtlasPage,
) -> wgpu::Sampler {
    let (min_filter, mipmap_filter) = min_and_mipmap_filter(&page.min_filter);
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("uyuni atlas sampler"),
        mag_filter: mag_filter(&page.mag_filter),
        min_filter,
        mipmap_filter,
        address_mode_u: address_mode(page.wrap_u),
        address_mode_v: address_mode(page.wrap_v),
        ..Default::default()
    })
}

fn address_mode(wrap: spine2d::AtlasWrap) -> wgpu::AddressMode {
    match wrap {
        spine2d::AtlasWrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        spine2d::AtlasWrap::Repeat => wgpu::AddressMode::Repeat,
    }
}

fn mag_filter(filter: &spine2d::AtlasFilter) -> wgpu::FilterMode {
    use spine2d::AtlasFilter as F;
    match filter {
        F::Nearest | F::MipMapNearestNearest | F::MipMapLinearNearest => wgpu::FilterMode::Nearest,
        _ => wgpu::FilterMode::Linear,
    }
}

fn min_and_mipmap_filter(filter: &spine2d::AtlasFilter) -> (wgpu::FilterMode, wgpu::FilterMode) {
    use spine2d::AtlasFilter as F;
    use wgpu::FilterMode::{Linear, Nearest};
    match filter {
        F::Nearest | F::MipMapNearestNearest => (Nearest, Nearest),
        F::MipMapNearestLinear => (Nearest, Linear),
        F::MipMap | F::MipMapLinearLinear => (Linear, Linear),
        F::Linear | F::MipMapLinearNearest | F::Other(_) => (Linear, Nearest),
    }
}
