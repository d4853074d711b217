//! Photo fingerprinting.

use super::PhotoFingerprint;
use crate::core::hasher::{FastDecoder, HashAlgorithm};
use crate::error::FingerprintError;
use std::path::Path;

/// Decode a photo and hash the full bitmap; dimensions come from the
/// decoded bounds, not from file metadata.
pub fn extract_photo(
    path: &Path,
    hasher: &dyn HashAlgorithm,
) -> Result<PhotoFingerprint, FingerprintError> {
    let image = FastDecoder::decode(path)?;
    let hash = hasher.hash_image(&image).map_err(|e| match e {
        FingerprintError::Decode { reason, .. } => FingerprintError::Decode {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })?;

    Ok(PhotoFingerprint {
        hash,
        width: image.width(),
        height: image.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::{ImageHasher, PerceptualHash};
    use image::{DynamicImage, ImageBuffer, Rgb};
    use std::fs;
    use tempfile::TempDir;

    /// 4x4 grid of flat blocks with scrambled brightness
    fn save_pattern(dir: &TempDir, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            let block = (x * 4 / width) + 4 * (y * 4 / height);
            let level = (block.wrapping_mul(2_654_435_761) >> 24) as u8;
            Rgb([level, level / 2 + 60, 255 - level])
        }));
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn reports_decoded_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = save_pattern(&dir, "wide.png", 64, 32);
        let hasher = ImageHasher::new();

        let fingerprint = extract_photo(&path, &hasher).unwrap();

        assert_eq!((fingerprint.width, fingerprint.height), (64, 32));
        assert_eq!(fingerprint.hash.as_bytes().len() * 8, 64);
    }

    #[test]
    fn same_pixels_in_two_formats_are_close() {
        let dir = TempDir::new().unwrap();
        let png = save_pattern(&dir, "a.png", 128, 128);
        let jpg = save_pattern(&dir, "a.jpg", 128, 128);
        let hasher = ImageHasher::new();

        let a = extract_photo(&png, &hasher).unwrap();
        let b = extract_photo(&jpg, &hasher).unwrap();

        assert!(a.hash.distance(&b.hash) <= 8);
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.jpg");
        fs::write(&path, b"this is not a valid image file").unwrap();
        let hasher = ImageHasher::new();

        match extract_photo(&path, &hasher) {
            Err(FingerprintError::Decode { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected decode error, got {:?}", other),
        }
    }
}
