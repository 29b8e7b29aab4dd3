//! wgpu textures and the slot bind group the scene shader samples from.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::image_decoder::DecodedImage;
use crate::texture_registry::{MAX_TEXTURE_SLOTS, TextureBackend};

/// A GPU texture with a full mip chain.
#[derive(Debug)]
pub struct Texture {
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
}

impl Texture {
    /// Upload tightly packed RGBA8 pixels and generate mipmaps on the CPU.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: Vec<u8>,
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let levels = mip_chain(rgba, width, height);
        let (width, height) = levels[0].dimensions();
        let data: Vec<u8> = levels.iter().flat_map(|level| level.as_raw()).copied().collect();

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: levels.len() as u32,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
            mip_levels: levels.len() as u32,
        }
    }

    /// 1×1 opaque white, bound to every unused slot.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::from_rgba(device, queue, vec![255; 4], 1, 1, "White Texture")
    }
}

/// Successively halved copies of the image down to 1×1, base level first.
///
/// Pixel data that does not match `width * height` is replaced by a single
/// white texel.
pub fn mip_chain(rgba: Vec<u8>, width: u32, height: u32) -> Vec<RgbaImage> {
    let base = RgbaImage::from_raw(width, height, rgba).unwrap_or_else(|| {
        log::warn!("texture data does not match {width}x{height}, using white");
        RgbaImage::from_pixel(1, 1, image::Rgba([255; 4]))
    });

    let mut levels = vec![base];
    loop {
        let last = &levels[levels.len() - 1];
        let (w, h) = last.dimensions();
        if w <= 1 && h <= 1 {
            break;
        }
        let next = imageops::resize(last, (w / 2).max(1), (h / 2).max(1), FilterType::Triangle);
        levels.push(next);
    }
    levels
}

/// wgpu [`TextureBackend`]: uploads into [`Texture`]s and rebuilds the slot
/// bind group on every bind.
pub struct GpuTextures {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    fallback: Texture,
    bind_group: wgpu::BindGroup,
}

impl GpuTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let mut entries: Vec<wgpu::BindGroupLayoutEntry> = (0..MAX_TEXTURE_SLOTS as u32)
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            })
            .collect();
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: MAX_TEXTURE_SLOTS as u32,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Slots Layout"),
            entries: &entries,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture Slots Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let fallback = Texture::white(device, queue);
        let bind_group = create_slot_bind_group(device, &layout, &sampler, &fallback, &[]);

        Self {
            device: device.clone(),
            queue: queue.clone(),
            layout,
            sampler,
            fallback,
            bind_group,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

impl TextureBackend for GpuTextures {
    type Handle = Texture;

    fn upload(&mut self, image: &DecodedImage, label: &str) -> Texture {
        let rgba = image.to_rgba8().unwrap_or_else(|| vec![255; 4]);
        Texture::from_rgba(
            &self.device,
            &self.queue,
            rgba,
            image.width,
            image.height,
            label,
        )
    }

    fn bind_slots(&mut self, handles: &[&Texture]) {
        self.bind_group = create_slot_bind_group(
            &self.device,
            &self.layout,
            &self.sampler,
            &self.fallback,
            handles,
        );
    }

    fn release(&mut self, handle: Texture) {
        handle.texture.destroy();
    }
}

fn create_slot_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    fallback: &Texture,
    textures: &[&Texture],
) -> wgpu::BindGroup {
    let mut entries: Vec<wgpu::BindGroupEntry> = (0..MAX_TEXTURE_SLOTS)
        .map(|slot| {
            let texture = textures.get(slot).copied().unwrap_or(fallback);
            wgpu::BindGroupEntry {
                binding: slot as u32,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            }
        })
        .collect();
    entries.push(wgpu::BindGroupEntry {
        binding: MAX_TEXTURE_SLOTS as u32,
        resource: wgpu::BindingResource::Sampler(sampler),
    });

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Texture Slots Bind Group"),
        layout,
        entries: &entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_chain_halves_down_to_one_texel() {
        let levels = mip_chain(vec![200; 8 * 4 * 4], 8, 4);
        let sizes: Vec<_> = levels.iter().map(|l| l.dimensions()).collect();
        assert_eq!(sizes, vec![(8, 4), (4, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn mip_levels_preserve_flat_color() {
        let levels = mip_chain(vec![200; 4 * 4 * 4], 4, 4);
        let last = levels.last().unwrap();
        assert_eq!(last.get_pixel(0, 0).0, [200; 4]);
    }

    #[test]
    fn mismatched_pixel_data_falls_back_to_white() {
        let levels = mip_chain(vec![0; 3], 2, 2);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].get_pixel(0, 0).0, [255; 4]);
    }
}
