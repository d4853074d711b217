//! Image decoding with a JPEG fast path.
//!
//! JPEG payloads go through zune-jpeg (1.5-2x faster than the image crate);
//! everything else, and any JPEG zune-jpeg rejects, goes through `image`.
//! The format is sniffed from the bytes, not the extension, so a PNG saved
//! as `.jpg` still decodes.

use crate::error::FingerprintError;
use image::{DynamicImage, ImageBuffer, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Decoder entry points used by photo and video-frame fingerprinting
pub struct FastDecoder;

impl FastDecoder {
    /// Read and decode an image file
    pub fn decode(path: &Path) -> Result<DynamicImage, FingerprintError> {
        let bytes = fs::read(path).map_err(|e| FingerprintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::decode_bytes(&bytes, path)
    }

    /// Decode an in-memory image. `path` is only used for error context.
    pub fn decode_bytes(bytes: &[u8], path: &Path) -> Result<DynamicImage, FingerprintError> {
        if bytes.is_empty() {
            return Err(FingerprintError::Decode {
                path: path.to_path_buf(),
                reason: "file is empty".to_string(),
            });
        }

        if bytes.starts_with(&JPEG_MAGIC) {
            if let Some(image) = Self::decode_jpeg(bytes) {
                return Ok(image);
            }
        }

        image::load_from_memory(bytes).map_err(|e| FingerprintError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// zune-jpeg decode; `None` means "let the image crate try"
    fn decode_jpeg(bytes: &[u8]) -> Option<DynamicImage> {
        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(bytes, options);

        let pixels = decoder.decode().ok()?;
        let info = decoder.info()?;
        let width = info.width as u32;
        let height = info.height as u32;

        match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels)?;
                Some(DynamicImage::ImageRgb8(buffer))
            }
            ColorSpace::RGBA => {
                let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels)?;
                Some(DynamicImage::ImageRgba8(buffer))
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels)?;
                Some(DynamicImage::ImageLuma8(buffer))
            }
            _ => None,
        }
    }
}
