//! Error types for resource loading and scene composition.
//!
//! Lookup misses on the hot path (material tags, texture slots) are not errors;
//! they surface as `Option`/`bool` so callers branch on them explicitly.

use thiserror::Error;

/// Failures while loading a texture into the [`TextureRegistry`](crate::TextureRegistry).
///
/// Every variant leaves the registry unmodified.
#[derive(Debug, Error)]
pub enum TextureError {
    /// The image decoder could not read or decode the file.
    #[error("could not load image '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// Only 3-channel (RGB) and 4-channel (RGBA) images are accepted.
    #[error("image '{path}' has {channels} channels, only RGB and RGBA are supported")]
    UnsupportedChannels { path: String, channels: u8 },

    /// All texture slots are already occupied.
    #[error("cannot register texture '{tag}': all {capacity} slots are in use")]
    CapacityExceeded { tag: String, capacity: usize },
}

/// Failures while binding per-draw state in the [`SceneComposer`](crate::SceneComposer).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The requested texture tag was never registered. Texturing is disabled
    /// for the draw instead of sampling an invalid slot.
    #[error("no texture registered under tag '{0}'")]
    TextureNotFound(String),
}
