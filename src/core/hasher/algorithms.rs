//! pHash on the image_hasher crate: `HashAlg::Mean` over a DCT-preprocessed
//! 8x8 grid, giving a 64-bit hash.

use super::traits::{HashAlgorithm, ImageHashValue};
use crate::error::FingerprintError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig};
use std::path::PathBuf;

/// Grid edge; accept thresholds are tuned for the 64 bits this gives
const HASH_SIZE: u32 = 8;

pub struct ImageHasher {
    hasher: image_hasher::Hasher,
}

impl ImageHasher {
    pub fn new() -> Self {
        let hasher = HasherConfig::new()
            .hash_size(HASH_SIZE, HASH_SIZE)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();
        Self { hasher }
    }
}

impl Default for ImageHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl HashAlgorithm for ImageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, FingerprintError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(FingerprintError::Decode {
                path: PathBuf::new(),
                reason: "image has no pixels".to_string(),
            });
        }

        let hash = self.hasher.hash_image(image);
        Ok(ImageHashValue::new(hash.as_bytes().to_vec()))
    }
}
