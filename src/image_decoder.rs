//! Image decoding for texture uploads.
//!
//! [`ImageDecoder`] is the seam between the texture registry and whatever turns
//! a path into pixels. [`FileImageDecoder`] is the `image`-crate backed
//! implementation used by the application.

use image::DynamicImage;

/// Raw decoded pixels, rows ordered bottom-to-top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Tightly packed 8-bit channels, `width * height * channels` bytes.
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Channels per pixel as stored in the source file (1 to 4).
    pub channels: u8,
}

impl DecodedImage {
    /// Expand to RGBA8, filling alpha with 255 for RGB input.
    ///
    /// Returns `None` for anything other than 3 or 4 channels.
    pub fn to_rgba8(&self) -> Option<Vec<u8>> {
        match self.channels {
            4 => Some(self.pixels.clone()),
            3 => Some(
                self.pixels
                    .chunks_exact(3)
                    .flat_map(|px| [px[0], px[1], px[2], 255])
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Decodes an image file into raw pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &str) -> Result<DecodedImage, image::ImageError>;
}

/// Decoder backed by the `image` crate.
///
/// The channel count reported is the file's native one; pixels are flipped
/// vertically so row 0 is the bottom of the image, matching UV origin.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileImageDecoder;

impl ImageDecoder for FileImageDecoder {
    fn decode(&self, path: &str) -> Result<DecodedImage, image::ImageError> {
        let img = image::open(path)?.flipv();
        Ok(from_dynamic(img))
    }
}

fn from_dynamic(img: DynamicImage) -> DecodedImage {
    let (width, height) = (img.width(), img.height());
    let channels = img.color().channel_count();

    // Keep the native channel count at 8 bits per channel.
    let pixels = match channels {
        1 => img.into_luma8().into_raw(),
        2 => img.into_luma_alpha8().into_raw(),
        3 => img.into_rgb8().into_raw(),
        _ => img.into_rgba8().into_raw(),
    };

    DecodedImage {
        pixels,
        width,
        height,
        channels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};

    #[test]
    fn rgb_expands_to_rgba() {
        let img = DecodedImage {
            pixels: vec![10, 20, 30, 40, 50, 60],
            width: 2,
            height: 1,
            channels: 3,
        };
        assert_eq!(
            img.to_rgba8(),
            Some(vec![10, 20, 30, 255, 40, 50, 60, 255])
        );
    }

    #[test]
    fn grayscale_does_not_expand() {
        let img = DecodedImage {
            pixels: vec![7, 8],
            width: 2,
            height: 1,
            channels: 1,
        };
        assert_eq!(img.to_rgba8(), None);
    }

    #[test]
    fn native_channel_counts_are_preserved() {
        let rgb = from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(2, 2)));
        assert_eq!(rgb.channels, 3);
        assert_eq!(rgb.pixels.len(), 12);

        let rgba = from_dynamic(DynamicImage::ImageRgba8(RgbaImage::new(2, 2)));
        assert_eq!(rgba.channels, 4);
        assert_eq!(rgba.pixels.len(), 16);

        let gray = from_dynamic(DynamicImage::ImageLuma8(GrayImage::new(3, 1)));
        assert_eq!(gray.channels, 1);
        assert_eq!((gray.width, gray.height), (3, 1));
    }
}
