//! Tag-addressed texture registry with a fixed number of sampler slots.
//!
//! Textures are appended in load order and the position in the registry is the
//! sampler slot the shader reads from. The registry is populated once during
//! scene preparation, bound with [`TextureRegistry::bind_all`], and torn down
//! with [`TextureRegistry::release_all`].

use crate::error::TextureError;
use crate::image_decoder::{DecodedImage, ImageDecoder};

/// Number of simultaneously bound texture slots.
pub const MAX_TEXTURE_SLOTS: usize = 16;

/// GPU side of texture management.
///
/// Implemented by [`GpuTextures`](crate::GpuTextures) for wgpu, and by in-memory
/// fakes in tests.
pub trait TextureBackend {
    type Handle;

    /// Upload a validated 3- or 4-channel image with repeat wrapping, linear
    /// filtering and a full mip chain.
    fn upload(&mut self, image: &DecodedImage, label: &str) -> Self::Handle;

    /// Make every handle resident, `handles[i]` in slot `i`.
    fn bind_slots(&mut self, handles: &[&Self::Handle]);

    /// Free the GPU resource behind a handle.
    fn release(&mut self, handle: Self::Handle);
}

/// A loaded texture and the tag it is looked up by.
#[derive(Debug)]
struct TextureEntry<H> {
    tag: String,
    handle: H,
}

/// Append-only registry of up to [`MAX_TEXTURE_SLOTS`] textures.
pub struct TextureRegistry<B: TextureBackend> {
    backend: B,
    entries: Vec<TextureEntry<B::Handle>>,
}

impl<B: TextureBackend> TextureRegistry<B> {
    /// Empty registry uploading through `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            entries: Vec::with_capacity(MAX_TEXTURE_SLOTS),
        }
    }

    /// Decode `path` and register it under `tag` in the next free slot.
    ///
    /// Returns the assigned slot. On any failure the registry is left as it
    /// was and a warning is logged.
    pub fn load(
        &mut self,
        decoder: &impl ImageDecoder,
        path: &str,
        tag: &str,
    ) -> Result<usize, TextureError> {
        let result = self.try_load(decoder, path, tag);
        if let Err(err) = &result {
            log::warn!("{err}");
        }
        result
    }

    fn try_load(
        &mut self,
        decoder: &impl ImageDecoder,
        path: &str,
        tag: &str,
    ) -> Result<usize, TextureError> {
        if self.entries.len() >= MAX_TEXTURE_SLOTS {
            return Err(TextureError::CapacityExceeded {
                tag: tag.to_string(),
                capacity: MAX_TEXTURE_SLOTS,
            });
        }

        let image = decoder.decode(path).map_err(|source| TextureError::Decode {
            path: path.to_string(),
            source,
        })?;

        if !matches!(image.channels, 3 | 4) {
            return Err(TextureError::UnsupportedChannels {
                path: path.to_string(),
                channels: image.channels,
            });
        }

        log::info!(
            "loaded image {path}: {}x{}, {} channels",
            image.width,
            image.height,
            image.channels
        );

        let handle = self.backend.upload(&image, tag);
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
        });
        Ok(self.entries.len() - 1)
    }

    /// Bind every registered texture to its slot.
    pub fn bind_all(&mut self) {
        let handles: Vec<&B::Handle> = self.entries.iter().map(|e| &e.handle).collect();
        self.backend.bind_slots(&handles);
    }

    /// Slot of the first texture registered under `tag`.
    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.tag == tag)
    }

    /// Handle of the first texture registered under `tag`.
    pub fn find_handle(&self, tag: &str) -> Option<&B::Handle> {
        self.entries.iter().find(|e| e.tag == tag).map(|e| &e.handle)
    }

    /// Free every texture. The registry is empty afterwards.
    ///
    /// Slots are unbound first so nothing still bound refers to a freed
    /// texture.
    pub fn release_all(&mut self) {
        self.backend.bind_slots(&[]);
        for entry in self.entries.drain(..) {
            self.backend.release(entry.handle);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The backend textures are uploaded through.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Decoder serving canned images keyed by path; unknown paths fail.
    #[derive(Default)]
    pub(crate) struct FakeDecoder {
        images: HashMap<String, DecodedImage>,
    }

    impl FakeDecoder {
        pub(crate) fn with(mut self, path: &str, channels: u8) -> Self {
            self.images.insert(
                path.to_string(),
                DecodedImage {
                    pixels: vec![128; 4 * channels as usize],
                    width: 2,
                    height: 2,
                    channels,
                },
            );
            self
        }
    }

    impl ImageDecoder for FakeDecoder {
        fn decode(&self, path: &str) -> Result<DecodedImage, image::ImageError> {
            self.images.get(path).cloned().ok_or_else(|| {
                image::ImageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    path.to_string(),
                ))
            })
        }
    }

    /// Backend handing out sequential ids and recording binds and releases.
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        next_id: u32,
        pub(crate) bound: Vec<u32>,
        pub(crate) released: Vec<u32>,
    }

    impl TextureBackend for FakeBackend {
        type Handle = u32;

        fn upload(&mut self, _image: &DecodedImage, _label: &str) -> u32 {
            self.next_id += 1;
            self.next_id
        }

        fn bind_slots(&mut self, handles: &[&u32]) {
            self.bound = handles.iter().map(|h| **h).collect();
        }

        fn release(&mut self, handle: u32) {
            self.released.push(handle);
        }
    }

    #[test]
    fn slots_follow_registration_order() {
        let decoder = FakeDecoder::default()
            .with("wood.jpg", 3)
            .with("paper.png", 4)
            .with("steel.png", 3);
        let mut registry = TextureRegistry::new(FakeBackend::default());

        assert_eq!(registry.load(&decoder, "wood.jpg", "wood").unwrap(), 0);
        assert_eq!(registry.load(&decoder, "paper.png", "paper").unwrap(), 1);
        assert_eq!(registry.load(&decoder, "steel.png", "steel").unwrap(), 2);

        assert_eq!(registry.find_slot("wood"), Some(0));
        assert_eq!(registry.find_slot("paper"), Some(1));
        assert_eq!(registry.find_slot("steel"), Some(2));
        assert_eq!(registry.find_slot("glass"), None);
    }

    #[test]
    fn unsupported_channel_counts_are_rejected() {
        let decoder = FakeDecoder::default()
            .with("wood.jpg", 3)
            .with("gray.png", 1)
            .with("gray_alpha.png", 2);
        let mut registry = TextureRegistry::new(FakeBackend::default());
        registry.load(&decoder, "wood.jpg", "wood").unwrap();

        for path in ["gray.png", "gray_alpha.png"] {
            let err = registry.load(&decoder, path, "gray").unwrap_err();
            assert!(matches!(err, TextureError::UnsupportedChannels { .. }));
        }
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find_slot("gray"), None);
    }

    #[test]
    fn decode_failure_leaves_registry_untouched() {
        let mut registry = TextureRegistry::new(FakeBackend::default());
        let err = registry
            .load(&FakeDecoder::default(), "missing.jpg", "wood")
            .unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn capacity_is_enforced() {
        let decoder = FakeDecoder::default().with("tile.png", 4);
        let mut registry = TextureRegistry::new(FakeBackend::default());
        for i in 0..MAX_TEXTURE_SLOTS {
            assert_eq!(registry.load(&decoder, "tile.png", &format!("t{i}")).unwrap(), i);
        }

        let err = registry.load(&decoder, "tile.png", "overflow").unwrap_err();
        assert!(matches!(err, TextureError::CapacityExceeded { capacity: 16, .. }));
        assert_eq!(registry.len(), MAX_TEXTURE_SLOTS);
    }

    #[test]
    fn duplicate_tags_resolve_to_first_slot() {
        let decoder = FakeDecoder::default().with("a.png", 4).with("b.png", 4);
        let mut registry = TextureRegistry::new(FakeBackend::default());
        registry.load(&decoder, "a.png", "shared").unwrap();
        registry.load(&decoder, "b.png", "shared").unwrap();

        assert_eq!(registry.find_slot("shared"), Some(0));
        assert_eq!(registry.find_handle("shared"), Some(&1));
    }

    #[test]
    fn bind_all_binds_in_slot_order_and_release_empties() {
        let decoder = FakeDecoder::default().with("a.png", 3).with("b.png", 4);
        let mut registry = TextureRegistry::new(FakeBackend::default());
        registry.load(&decoder, "a.png", "a").unwrap();
        registry.load(&decoder, "b.png", "b").unwrap();

        registry.bind_all();
        assert_eq!(registry.backend().bound, vec![1, 2]);

        registry.release_all();
        assert!(registry.is_empty());
        assert_eq!(registry.backend().released, vec![1, 2]);
        assert!(registry.backend().bound.is_empty());
    }
}
