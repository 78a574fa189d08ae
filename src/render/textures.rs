//! GPU textures keyed by [`TextureKey`], with solid-colour built-ins.

use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::geometry::Rgba;
use crate::scene::TextureKey;

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

pub struct TextureStore {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<TextureKey, GpuTexture>,
}

impl TextureStore {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("album-texture-bgl"),
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
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("album-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let mut store = Self {
            layout,
            sampler,
            textures: HashMap::new(),
        };
        for (key, color) in [
            (TextureKey::Black, Rgba::BLACK),
            (TextureKey::White, Rgba::WHITE),
            (TextureKey::Placeholder, Rgba::GRAY),
        ] {
            let pixel = RgbaImage::from_pixel(1, 1, image::Rgba([color.r, color.g, color.b, color.a]));
            store.upload(device, queue, key, &pixel);
        }
        store
    }

    pub const fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn contains(&self, key: &TextureKey) -> bool {
        self.textures.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        key: TextureKey,
        image: &RgbaImage,
    ) {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("album-texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        if width > 0 && height > 0 {
            queue.write_texture(
                texture.as_image_copy(),
                image.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                size,
            );
        }
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("album-texture-bind-group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.textures.insert(
            key,
            GpuTexture {
                _texture: texture,
                bind_group,
            },
        );
    }

    /// Drop the thumbnail and full-size textures of `path`.
    /// Drop only the full-size texture of `path`; thumbnails stay.
    pub fn release_full(&mut self, path: &Path) {
        if self.textures.remove(&TextureKey::Full(path.to_path_buf())).is_some() {
            debug!(path = %path.display(), "full-size texture released");
        }
    }

    pub fn release_path(&mut self, path: &Path) {
        let before = self.textures.len();
        self.textures.retain(|key, _| match key {
            TextureKey::Thumb(p) | TextureKey::Full(p) => p != path,
            _ => true,
        });
        debug!(
            path = %path.display(),
            released = before - self.textures.len(),
            "textures released"
        );
    }

    /// Bind group for `key`, or the black placeholder when it is missing.
    pub fn bind_group(&self, key: &TextureKey) -> Option<&wgpu::BindGroup> {
        self.textures
            .get(key)
            .or_else(|| self.textures.get(&TextureKey::Black))
            .map(|t| &t.bind_group)
    }
}
